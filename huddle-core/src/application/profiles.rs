use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::users::{NewProfile, Profile};
use crate::error::{HuddleError, Result};

#[derive(Debug, Clone)]
pub struct ProfileService {
    uow: Arc<AppUnitOfWork>,
}

impl ProfileService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn create_profile(
        &self,
        user_id: Uuid,
        request: NewProfile,
        now: DateTime<Utc>,
    ) -> Result<Profile> {
        let profile = request.validate()?.into_profile(user_id, now);
        self.uow.profiles.create_profile(&profile).await?;
        info!(%user_id, profile_id = %profile.profile_id, "created profile");
        Ok(profile)
    }

    pub async fn list_profiles(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        self.uow.profiles.list_profiles_for_user(user_id).await
    }

    /// Resolve `profile_id` and check it belongs to `user_id`.
    pub async fn owned_profile(&self, user_id: Uuid, profile_id: Uuid) -> Result<Profile> {
        owned_profile(&self.uow, user_id, profile_id).await
    }
}

pub(crate) async fn owned_profile(
    uow: &AppUnitOfWork,
    user_id: Uuid,
    profile_id: Uuid,
) -> Result<Profile> {
    let profile = uow
        .profiles
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| HuddleError::NotFound("Profile not found".to_string()))?;
    if profile.user_id != user_id {
        return Err(HuddleError::Forbidden(
            "Profile belongs to another account".to_string(),
        ));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::accounts::AccountService;
    use crate::domain::users::RegisterRequest;
    use crate::domain::users::auth::{AuthCrypto, SessionPolicy};

    async fn registered(uow: &Arc<AppUnitOfWork>, email: &str) -> (Uuid, Profile) {
        let crypto = Arc::new(AuthCrypto::for_tests("pepper", "key").unwrap());
        let outcome = AccountService::new(uow.clone(), crypto, SessionPolicy::default())
            .register(
                RegisterRequest {
                    email: email.into(),
                    password: "secret1".into(),
                    confirm_password: "secret1".into(),
                    first_name: "Sam".into(),
                    last_name: "Lee".into(),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        (outcome.user.user_id, outcome.profiles[0].clone())
    }

    #[tokio::test]
    async fn profile_names_are_unique_per_user_only() {
        let uow = Arc::new(AppUnitOfWork::in_memory());
        let service = ProfileService::new(uow.clone());
        let (alice, _) = registered(&uow, "alice@example.com").await;
        let (bob, _) = registered(&uow, "bob@example.com").await;

        let kids = || NewProfile {
            profile_name: "Kids".into(),
            display_name: "The Kids".into(),
        };
        service.create_profile(alice, kids(), Utc::now()).await.unwrap();
        service.create_profile(bob, kids(), Utc::now()).await.unwrap();

        let err = service
            .create_profile(alice, kids(), Utc::now())
            .await
            .unwrap_err();
        assert!(
            matches!(err, HuddleError::Conflict(msg) if msg == "You already have a profile with this name")
        );
        assert_eq!(service.list_profiles(alice).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ownership_is_enforced() {
        let uow = Arc::new(AppUnitOfWork::in_memory());
        let service = ProfileService::new(uow.clone());
        let (alice, alice_profile) = registered(&uow, "alice@example.com").await;
        let (bob, _) = registered(&uow, "bob@example.com").await;

        assert!(service.owned_profile(alice, alice_profile.profile_id).await.is_ok());
        assert!(matches!(
            service.owned_profile(bob, alice_profile.profile_id).await,
            Err(HuddleError::Forbidden(_))
        ));
        assert!(matches!(
            service.owned_profile(bob, Uuid::now_v7()).await,
            Err(HuddleError::NotFound(_))
        ));
    }
}
