use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{TryRngCore, rngs::OsRng};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Password hashing and bearer-token digests for account authentication.
///
/// Passwords are hashed with Argon2id over `password || pepper`. Bearer
/// tokens are random and only their HMAC-SHA-256 digest is persisted, so a
/// leaked sessions table cannot be replayed.
#[derive(Debug)]
pub struct AuthCrypto {
    argon2: Argon2<'static>,
    password_pepper: Zeroizing<Vec<u8>>,
    token_key: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum AuthCryptoError {
    #[error("password pepper must not be empty")]
    EmptyPasswordPepper,
    #[error("token HMAC key must not be empty")]
    EmptyTokenKey,
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
    #[error("random source unavailable: {0}")]
    Entropy(String),
}

impl From<password_hash::Error> for AuthCryptoError {
    fn from(err: password_hash::Error) -> Self {
        AuthCryptoError::PasswordHash(err.to_string())
    }
}

impl AuthCrypto {
    const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    const DEFAULT_ITERATIONS: u32 = 2;
    const DEFAULT_PARALLELISM: u32 = 1;
    const TOKEN_BYTES: usize = 32;

    pub fn new(
        password_pepper: impl AsRef<[u8]>,
        token_key: impl AsRef<[u8]>,
    ) -> Result<Self, AuthCryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Self::DEFAULT_MEMORY_KIB)
            .t_cost(Self::DEFAULT_ITERATIONS)
            .p_cost(Self::DEFAULT_PARALLELISM)
            .output_len(32)
            .build()
            .map_err(|err| {
                AuthCryptoError::InvalidArgon2Params(err.to_string())
            })?;
        Self::with_params(password_pepper, token_key, params)
    }

    /// Cheap Argon2 parameters for tests and seed scripts.
    pub fn for_tests(
        password_pepper: impl AsRef<[u8]>,
        token_key: impl AsRef<[u8]>,
    ) -> Result<Self, AuthCryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Params::MIN_M_COST.max(8))
            .t_cost(1)
            .p_cost(1)
            .build()
            .map_err(|err| {
                AuthCryptoError::InvalidArgon2Params(err.to_string())
            })?;
        Self::with_params(password_pepper, token_key, params)
    }

    pub fn with_params(
        password_pepper: impl AsRef<[u8]>,
        token_key: impl AsRef<[u8]>,
        params: Params,
    ) -> Result<Self, AuthCryptoError> {
        let pepper = password_pepper.as_ref();
        if pepper.is_empty() {
            return Err(AuthCryptoError::EmptyPasswordPepper);
        }
        let key = token_key.as_ref();
        if key.is_empty() {
            return Err(AuthCryptoError::EmptyTokenKey);
        }

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
            password_pepper: Zeroizing::new(pepper.to_vec()),
            token_key: Zeroizing::new(key.to_vec()),
        })
    }

    fn peppered(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut material = Zeroizing::new(Vec::with_capacity(
            password.len() + self.password_pepper.len(),
        ));
        material.extend_from_slice(password.as_bytes());
        material.extend_from_slice(&self.password_pepper);
        material
    }

    /// Produce a PHC-formatted Argon2id hash suitable for storage.
    pub fn hash_password(
        &self,
        password: &str,
    ) -> Result<String, AuthCryptoError> {
        let mut salt_bytes = [0u8; password_hash::Salt::RECOMMENDED_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| AuthCryptoError::Entropy(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;
        let material = self.peppered(password);
        Ok(self.argon2.hash_password(&material, &salt)?.to_string())
    }

    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, AuthCryptoError> {
        let parsed = PasswordHash::new(stored_hash)?;
        let material = self.peppered(password);
        Ok(self.argon2.verify_password(&material, &parsed).is_ok())
    }

    /// Generate a fresh opaque bearer token (base64url, no padding).
    pub fn generate_token(&self) -> Result<String, AuthCryptoError> {
        let mut bytes = Zeroizing::new([0u8; Self::TOKEN_BYTES]);
        OsRng
            .try_fill_bytes(&mut bytes[..])
            .map_err(|err| AuthCryptoError::Entropy(err.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(&bytes[..]))
    }

    /// Hex HMAC-SHA-256 digest of a bearer token, used as the lookup key.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.token_key)
            .expect("HMAC-SHA-256 accepts keys of any size");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> AuthCrypto {
        AuthCrypto::for_tests("pepper", "token-key").unwrap()
    }

    #[test]
    fn hashes_passwords_and_verifies() {
        let crypto = crypto();
        let hash = crypto.hash_password("touchdown").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password("touchdown", &hash).unwrap());
        assert!(!crypto.verify_password("field goal", &hash).unwrap());
    }

    #[test]
    fn pepper_participates_in_hash() {
        let hash = crypto().hash_password("touchdown").unwrap();
        let other = AuthCrypto::for_tests("other", "token-key").unwrap();
        assert!(!other.verify_password("touchdown", &hash).unwrap());
    }

    #[test]
    fn tokens_are_unique_and_digest_to_hex() {
        let crypto = crypto();
        let a = crypto.generate_token().unwrap();
        let b = crypto.generate_token().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);

        let digest = crypto.hash_token(&a);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, crypto.hash_token(&a));
    }

    #[test]
    fn rejects_empty_secrets() {
        assert!(matches!(
            AuthCrypto::new("", "token"),
            Err(AuthCryptoError::EmptyPasswordPepper)
        ));
        assert!(matches!(
            AuthCrypto::new("pepper", ""),
            Err(AuthCryptoError::EmptyTokenKey)
        ));
    }
}
