use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::users::auth::{AuthCrypto, AuthSession, IssuedTokens, SessionPolicy};
use crate::domain::users::user::normalize_email;
use crate::domain::users::{
    ChangePasswordRequest, LoginRequest, NewProfile, Profile, RegisterRequest, User,
};
use crate::error::{HuddleError, Result};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_SESSION: &str = "Invalid or expired token";

/// Tokens plus the account they were issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    pub user: User,
    pub profiles: Vec<Profile>,
    pub tokens: IssuedTokens,
}

/// A bearer token resolved to its live session and user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session_id: Uuid,
}

/// Registration, login and session lifecycle.
#[derive(Clone)]
pub struct AccountService {
    uow: Arc<AppUnitOfWork>,
    crypto: Arc<AuthCrypto>,
    policy: SessionPolicy,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(
        uow: Arc<AppUnitOfWork>,
        crypto: Arc<AuthCrypto>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            uow,
            crypto,
            policy,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome> {
        let registration = request.validate()?;

        if self
            .uow
            .users
            .get_user_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(HuddleError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = User {
            user_id: Uuid::now_v7(),
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        let default_name = registration.default_profile_name();
        let profile = NewProfile {
            profile_name: default_name.clone(),
            display_name: default_name,
        }
        .validate()?
        .into_profile(user.user_id, now);

        let password_hash = self.crypto.hash_password(&registration.password)?;
        self.uow
            .users
            .create_user_with_profile(&user, &password_hash, &profile)
            .await?;

        let tokens = self.open_session(user.user_id, now).await?;
        info!(user_id = %user.user_id, "registered new account");
        Ok(AuthOutcome {
            user,
            profiles: vec![profile],
            tokens,
        })
    }

    pub async fn login(
        &self,
        request: LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome> {
        let invalid = || HuddleError::Unauthorized(INVALID_CREDENTIALS.to_string());
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(HuddleError::Validation(
                "Please enter both email and password".to_string(),
            ));
        }
        let email = normalize_email(&request.email).map_err(|_| invalid())?;

        let user = self
            .uow
            .users
            .get_user_by_email(&email)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(invalid)?;
        let stored_hash = self
            .uow
            .users
            .get_password_hash(user.user_id)
            .await?
            .ok_or_else(invalid)?;

        if !self.crypto.verify_password(&request.password, &stored_hash)? {
            debug!(user_id = %user.user_id, "password verification failed");
            return Err(invalid());
        }

        self.uow.users.record_login(user.user_id, now).await?;
        let tokens = self.open_session(user.user_id, now).await?;
        let profiles = self.uow.profiles.list_profiles_for_user(user.user_id).await?;
        Ok(AuthOutcome {
            user: User {
                last_login_at: Some(now),
                ..user
            },
            profiles,
            tokens,
        })
    }

    /// Exchange a refresh token for a new token pair on the same session.
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<IssuedTokens> {
        let hash = self.crypto.hash_token(refresh_token);
        let session = self
            .uow
            .sessions
            .find_by_refresh_hash(&hash)
            .await?
            .filter(|session| session.refresh_valid_at(now))
            .ok_or_else(|| HuddleError::Unauthorized(INVALID_SESSION.to_string()))?;

        let access_token = self.crypto.generate_token()?;
        let refresh_token = self.crypto.generate_token()?;
        let rotated = AuthSession {
            access_token_hash: self.crypto.hash_token(&access_token),
            refresh_token_hash: self.crypto.hash_token(&refresh_token),
            access_expires_at: now + self.policy.access_ttl,
            refresh_expires_at: now + self.policy.refresh_ttl,
            ..session
        };
        self.uow.sessions.rotate_tokens(&rotated).await?;
        Ok(self.issued(access_token, refresh_token))
    }

    pub async fn logout(&self, access_token: &str, now: DateTime<Utc>) -> Result<()> {
        let authenticated = self.authenticate(access_token, now).await?;
        self.uow
            .sessions
            .revoke_session(authenticated.session_id, now)
            .await
    }

    pub async fn authenticate(
        &self,
        access_token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser> {
        let unauthorized = || HuddleError::Unauthorized(INVALID_SESSION.to_string());
        let hash = self.crypto.hash_token(access_token);
        let session = self
            .uow
            .sessions
            .find_by_access_hash(&hash)
            .await?
            .filter(|session| session.access_valid_at(now))
            .ok_or_else(unauthorized)?;
        let user = self
            .uow
            .users
            .get_user_by_id(session.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(unauthorized)?;
        Ok(AuthenticatedUser {
            user,
            session_id: session.session_id,
        })
    }

    /// Replace the password and sign the user out everywhere.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
        now: DateTime<Utc>,
    ) -> Result<()> {
        request.validate()?;
        let stored_hash = self
            .uow
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or_else(|| HuddleError::NotFound("User not found".to_string()))?;
        if !self
            .crypto
            .verify_password(&request.current_password, &stored_hash)?
        {
            return Err(HuddleError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = self.crypto.hash_password(&request.new_password)?;
        self.uow
            .users
            .update_password(user_id, &new_hash, now)
            .await?;
        let revoked = self.uow.sessions.revoke_user_sessions(user_id, now).await?;
        info!(%user_id, revoked, "password changed; sessions revoked");
        Ok(())
    }

    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        let purged = self.uow.sessions.purge_expired(now).await?;
        if purged > 0 {
            debug!(purged, "purged expired sessions");
        }
        Ok(purged)
    }

    async fn open_session(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<IssuedTokens> {
        let access_token = self.crypto.generate_token()?;
        let refresh_token = self.crypto.generate_token()?;
        let session = AuthSession {
            session_id: Uuid::now_v7(),
            user_id,
            access_token_hash: self.crypto.hash_token(&access_token),
            refresh_token_hash: self.crypto.hash_token(&refresh_token),
            access_expires_at: now + self.policy.access_ttl,
            refresh_expires_at: now + self.policy.refresh_ttl,
            created_at: now,
            revoked_at: None,
        };
        if let Err(err) = self.uow.sessions.create_session(&session).await {
            warn!(%user_id, error = %err, "failed to persist session");
            return Err(err);
        }
        Ok(self.issued(access_token, refresh_token))
    }

    fn issued(&self, access_token: String, refresh_token: String) -> IssuedTokens {
        IssuedTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.policy.access_ttl.num_seconds(),
        }
    }
}
