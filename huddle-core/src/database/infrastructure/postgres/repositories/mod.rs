pub mod maintenance;
pub mod nfl;
pub mod pools;
pub mod profiles;
pub mod scores;
pub mod selections;
pub mod sessions;
pub mod users;
