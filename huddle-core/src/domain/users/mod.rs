pub mod auth;
pub mod profile;
pub mod user;

pub use profile::{NewProfile, Profile};
pub use user::{
    ChangePasswordRequest, LoginRequest, MIN_PASSWORD_LENGTH,
    RegisterRequest, Registration, User,
};
