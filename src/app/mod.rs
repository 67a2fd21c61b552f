//! Application interface and state.

pub mod error;

use std::sync::Arc;

pub use error::AppError;

use axum_valid::{Garde, GardeRejection, HasValidate};

use axum::{
    Form, Json, RequestExt as _,
    extract::{FromRef, FromRequest, Request},
    response::{IntoResponse, Response},
};

use derive_more::Deref;

use garde::Validate;
use http::header;

use serde::de::DeserializeOwned;

use crate::{app::error::AppErrorKind, auth::Authenticator, config::Config, store::UserStore};

/// Shared app state.
///
/// Cheaply cloneable.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    /// User record storage.
    pub store: UserStore,
    /// How requests are tied to users.
    pub auth: Authenticator,
    /// Server config.
    ///
    /// May be missing secrets as they are taken at initialization.
    pub config: Arc<Config>,
}

// Request payloads are validated without any context.
impl FromRef<AppState> for () {
    fn from_ref(_: &AppState) {}
}

/// Selective body extractor.
///
/// The API can accept both JSON and urlencoded bodies.
#[derive(Deref)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // switch on content type
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppErrorKind::MissingContentType)?;

        // drop parameters like `charset`
        let mime = content_type.split(';').next().unwrap_or_default().trim();

        match mime {
            "application/x-www-form-urlencoded" => {
                let AppForm(form) = req.extract_with_state::<AppForm<T>, _, _>(state).await?;
                Ok(Payload(form))
            }
            "application/json" => {
                let AppJson(json) = req.extract_with_state::<AppJson<T>, _, _>(state).await?;
                Ok(Payload(json))
            }
            mime => Err(AppErrorKind::UnsupportedContentType(mime.to_owned()).into()),
        }
    }
}

impl<T> HasValidate for Payload<T> {
    type Validate = T;

    fn get_validate(&self) -> &Self::Validate {
        &self.0
    }
}

/// App Garde extractor.
#[derive(Deref)]
pub struct AppGarde<T>(pub T);

impl<S, T> FromRequest<S> for AppGarde<T>
where
    S: Send + Sync,
    T: FromRequest<S> + HasValidate + 'static,
    AppError: From<<T as FromRequest<S>>::Rejection>,
    <T as HasValidate>::Validate: Validate,
    <<T as HasValidate>::Validate as Validate>::Context: Send + Sync + FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let valid = request.extract_with_state::<Garde<T>, S, _>(state).await;

        match valid {
            Ok(Garde(valid)) => Ok(AppGarde(valid)),
            Err(GardeRejection::Valid(garde)) => Err(AppErrorKind::Garde(garde).into()),
            Err(GardeRejection::Inner(err)) => Err(err.into()),
        }
    }
}

/// App Form extractor.
#[derive(Deref, FromRequest)]
#[from_request(via(Form), rejection(AppError))]
pub struct AppForm<T>(pub T);

/// App JSON extractor and responder.
#[derive(Deref, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}
