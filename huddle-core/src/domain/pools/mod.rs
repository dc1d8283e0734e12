pub mod draft;
pub mod participant;
pub mod pool;
pub mod score;

pub use draft::{DRAFT_SIZE, DraftPicks, TeamSelection};
pub use participant::PoolParticipant;
pub use pool::{CreatePoolRequest, Pool};
pub use score::PoolScore;
