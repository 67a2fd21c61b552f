//! Signed login tokens.
//!
//! A token is `<hex username>.<hex digest>`, where the digest is
//! `sha256(secret || sha256(username))`. Only the server can produce a valid
//! digest for a username.

use http::{header, request::Parts};

use rand::{
    Rng,
    distr::{Alphanumeric, SampleString},
};

use sha2::{Digest as _, Sha256};

use super::Authenticate;

use crate::app::{AppError, error::AppErrorKind};

pub const SECRET_LENGTH: usize = 64;

/// Accepts `Authorization: Bearer` tokens handed out at login.
#[derive(Clone)]
pub struct TokenAuth {
    secret: Vec<u8>,
}

impl TokenAuth {
    /// Creates a token scheme signing with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> TokenAuth {
        TokenAuth {
            secret: secret.as_ref().to_owned(),
        }
    }

    /// Creates a token for a username.
    pub fn sign(&self, username: &str) -> String {
        format!(
            "{}.{}",
            base16::encode_lower(username.as_bytes()),
            base16::encode_lower(&self.digest(username))
        )
    }

    /// Checks a token, returning the username it was issued for.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (username, digest) = token.split_once('.')?;

        let username = String::from_utf8(base16::decode(username).ok()?).ok()?;
        let digest = base16::decode(digest).ok()?;

        let expected = self.digest(&username);

        // compare every byte, regardless of where the first mismatch is
        let matches = digest.len() == expected.len()
            && digest
                .iter()
                .zip(expected.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0;

        (matches && !username.is_empty()).then_some(username)
    }

    fn digest(&self, username: &str) -> Vec<u8> {
        let inner = Sha256::digest(username.as_bytes());

        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(inner);
        hasher.finalize().to_vec()
    }
}

// keep the secret out of logs
impl std::fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth").finish_non_exhaustive()
    }
}

impl Authenticate for TokenAuth {
    fn authenticate(&self, parts: &Parts) -> Result<String, AppError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|s| s.to_str().ok())
            .and_then(|s| s.trim().strip_prefix("Bearer "))
            .map(|s| s.trim())
            .ok_or_else(|| {
                AppError::from(AppErrorKind::Unauthenticated).with_message("missing bearer token")
            })?;

        self.verify(token)
            .ok_or_else(|| AppErrorKind::BadCredentials.into())
    }

    fn issue(&self, username: &str) -> Option<String> {
        Some(self.sign(username))
    }
}

/// Generates a new signing secret.
pub fn generate_secret() -> String {
    generate_secret_with(&mut rand::rng())
}

/// Generates a new signing secret.
pub fn generate_secret_with<R>(rng: &mut R) -> String
where
    R: Rng,
{
    Alphanumeric.sample_string(rng, SECRET_LENGTH)
}
