//! Application error that may occur during the processing of a request.
//!
//! See [`AppError`].

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    response::{IntoResponse, Response},
};

use derive_more::{Display, From};

use http::StatusCode;

use music_clicker_model::ApiError;

use crate::{app::AppJson, game::InsufficientFunds, store::StoreError};

/// Application error that may occur during the processing of a request.
///
/// This includes both internal errors and user errors.
#[derive(Debug)]
pub struct AppError {
    kind: AppErrorKind,
    message: Option<String>,
}

impl AppError {
    /// Creates an internal error from any error.
    pub fn new<E>(error: E) -> AppError
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        AppErrorKind::Other(error.into()).into()
    }

    /// Replaces the message shown to the client.
    pub fn with_message(mut self, message: impl Into<String>) -> AppError {
        self.message = Some(message.into());
        self
    }

    /// The inner [`AppErrorKind`] of the error.
    pub fn kind(&self) -> &AppErrorKind {
        &self.kind
    }

    /// Discards the error message, unwrapping the inner error.
    pub fn into_kind(self) -> AppErrorKind {
        self.kind
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.message.as_ref() {
            Some(msg) => f.write_str(msg),
            None => Display::fmt(&self.kind, f),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            AppErrorKind::Json(err) => Some(err),
            AppErrorKind::Form(err) => Some(err),
            AppErrorKind::Garde(err) => Some(err),
            AppErrorKind::InsufficientFunds(err) => Some(err),
            AppErrorKind::Store(err) => Some(err),
            AppErrorKind::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl<T> From<T> for AppError
where
    T: Into<AppErrorKind>,
{
    fn from(value: T) -> Self {
        AppError {
            kind: value.into(),
            message: None,
        }
    }
}

/// The specific kind of error that happened.
#[derive(Debug, Display, From)]
#[non_exhaustive]
pub enum AppErrorKind {
    /// The request's JSON payload was malformed or invalid.
    #[display("{_0}")]
    Json(JsonRejection),
    /// The request's form payload was malformed or invalid.
    #[display("{_0}")]
    Form(FormRejection),
    /// The request has a body but no `Content-Type`.
    #[display("missing content type")]
    #[from(skip)]
    MissingContentType,
    /// The request body is in a format the API does not accept.
    #[display("unsupported content type {_0}")]
    #[from(skip)]
    UnsupportedContentType(String),
    /// The request payload failed validation.
    #[display("{_0}")]
    Garde(garde::Report),
    /// The request did not identify a user.
    #[display("no username")]
    #[from(skip)]
    Unauthenticated,
    /// The request identified a user with a bad token.
    #[display("invalid credentials")]
    #[from(skip)]
    BadCredentials,
    /// The user cannot afford what they tried to buy.
    #[display("{_0}")]
    InsufficientFunds(InsufficientFunds),
    /// User records could not be read or written.
    #[display("{_0}")]
    Store(StoreError),
    /// Any other internal error.
    #[display("{_0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            AppErrorKind::Json(_)
            | AppErrorKind::Form(_)
            | AppErrorKind::MissingContentType
            | AppErrorKind::UnsupportedContentType(_)
            | AppErrorKind::Garde(_)
            | AppErrorKind::InsufficientFunds(_) => Some(StatusCode::BAD_REQUEST),
            AppErrorKind::Unauthenticated | AppErrorKind::BadCredentials => {
                Some(StatusCode::UNAUTHORIZED)
            }
            _ => None,
        };

        // never leak internal errors to the client
        let Some(status) = status else {
            let error = ApiError {
                message: "An internal server error occured.".into(),
            };

            let mut response = (StatusCode::INTERNAL_SERVER_ERROR, AppJson(error)).into_response();
            response.extensions_mut().insert(Arc::new(self.kind));
            return response;
        };

        // user errors are sent as plain text, so clients can show them as is
        let message = match self.message {
            Some(message) => message,
            None => self.kind.to_string(),
        };

        (status, message).into_response()
    }
}
