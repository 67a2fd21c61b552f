//! Bare username header.

use http::{header::HeaderName, request::Parts};

use super::Authenticate;

use crate::app::{AppError, error::AppErrorKind};

pub const X_USERNAME: HeaderName = HeaderName::from_static("x-username");

/// Trusts the `x-username` header.
///
/// Anyone can act as any user; there is nothing to check the header against.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderAuth;

impl Authenticate for HeaderAuth {
    fn authenticate(&self, parts: &Parts) -> Result<String, AppError> {
        parts
            .headers
            .get(X_USERNAME)
            .and_then(|s| s.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppErrorKind::Unauthenticated.into())
    }

    fn issue(&self, _username: &str) -> Option<String> {
        None
    }
}
