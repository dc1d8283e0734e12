use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::users::profile::MAX_PROFILE_TEXT;
use crate::domain::validation::{ValidationError, required_text};

pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_NAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 254;

/// An account holder. Credentials are stored separately from this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// A registration that passed validation, with the email normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Registration {
    /// Name used for the profile created alongside the account, cut to
    /// the profile length limit.
    pub fn default_profile_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let cut: String = full.chars().take(MAX_PROFILE_TEXT).collect();
        cut.trim_end().to_string()
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        let fields = [
            self.email.as_str(),
            self.password.as_str(),
            self.confirm_password.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ];
        if fields.iter().any(|value| value.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        validate_password(&self.password)?;

        Ok(Registration {
            email: normalize_email(&self.email)?,
            password: self.password.clone(),
            first_name: required_text(
                "First name",
                &self.first_name,
                MAX_NAME_LENGTH,
            )?,
            last_name: required_text(
                "Last name",
                &self.last_name,
                MAX_NAME_LENGTH,
            )?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.new_password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        validate_password(&self.new_password)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Lower-case and sanity check an email address.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidEmail);
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(ValidationError::InvalidEmail),
    }
}
