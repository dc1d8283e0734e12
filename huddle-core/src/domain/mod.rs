pub mod nfl;
pub mod pools;
pub mod scoring;
pub mod users;
pub mod validation;
