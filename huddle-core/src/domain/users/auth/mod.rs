pub mod crypto;
pub mod session;

pub use crypto::{AuthCrypto, AuthCryptoError};
pub use session::{AuthSession, IssuedTokens, SessionPolicy};
