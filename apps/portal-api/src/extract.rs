//! Request-body extraction.
//!
//! A body that fails to deserialize (malformed JSON, missing required field,
//! unknown enum value) never reaches a handler, but it still left this server
//! as a response - so it must wear the same envelope as every other failure.
//! This wrapper turns axum's plain-text rejection into a `VALIDATION_ERROR`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use atrium_core::error::ValidationError;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an enveloped [`ApiError`].
///
/// Drop-in for `axum::Json` on both sides of a handler.
#[derive(Debug, Clone, Copy)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::Validation(ValidationError::single(
                "body",
                rejection.body_text(),
            ))),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
