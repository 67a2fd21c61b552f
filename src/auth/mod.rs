//! User authentication.
//!
//! How a request is tied to a user is decided by an [`Authenticate`]
//! implementation chosen at startup. Handlers only ever see the resulting
//! [`AuthenticatedUser`].

pub mod header;
pub mod token;

use std::{fmt::Debug, sync::Arc};

use axum::extract::{FromRef, FromRequestParts};

use derive_more::Deref;

use http::request::Parts;

use crate::{app::AppError, config::AuthConfig};

pub use header::HeaderAuth;
pub use token::TokenAuth;

/// A way of identifying the user behind a request.
pub trait Authenticate: Debug + Send + Sync {
    /// Resolves the username a request is acting as.
    fn authenticate(&self, parts: &Parts) -> Result<String, AppError>;

    /// Issues a credential for a freshly logged in user.
    ///
    /// Returns `None` if clients don't need one.
    fn issue(&self, username: &str) -> Option<String>;
}

/// The authentication scheme in use.
///
/// Cheaply cloneable.
#[derive(Clone, Debug)]
pub struct Authenticator(Arc<dyn Authenticate>);

impl Authenticator {
    /// Wraps an authentication scheme.
    pub fn new(auth: impl Authenticate + 'static) -> Authenticator {
        Authenticator(Arc::new(auth))
    }

    /// Picks the authentication scheme for a configuration.
    ///
    /// Signed tokens are used if a secret is configured.
    pub fn from_config(config: &AuthConfig) -> Authenticator {
        match config.secret.as_ref() {
            Some(secret) => Authenticator::new(TokenAuth::new(secret)),
            None => Authenticator::new(HeaderAuth),
        }
    }

    /// Resolves the username a request is acting as.
    pub fn authenticate(&self, parts: &Parts) -> Result<String, AppError> {
        self.0.authenticate(parts)
    }

    /// Issues a credential for a freshly logged in user.
    pub fn issue(&self, username: &str) -> Option<String> {
        self.0.issue(username)
    }
}

/// An authenticated user.
#[derive(Clone, Debug, Deref)]
pub struct AuthenticatedUser {
    /// The username of the user.
    #[deref]
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // if the result was cached, simply return the cached value
        if let Some(auth) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(auth.clone());
        }

        let username = Authenticator::from_ref(state).authenticate(parts)?;

        let auth = AuthenticatedUser { username };
        parts.extensions.insert(auth.clone());

        Ok(auth)
    }
}
