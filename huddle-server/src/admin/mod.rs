//! Results entry and rescoring, guarded by the shared service key.

pub mod handlers;
pub mod middleware;

pub use middleware::service_key_middleware;
