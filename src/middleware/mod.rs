use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;
use crate::validation;

/// JSON body that has been deserialized and validated.
///
/// Body problems (bad JSON, missing fields, wrong types, wrong content type)
/// surface as `ValidationError`s instead of axum's default rejections.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::validation(format!("Invalid input: {}", rejection.body_text()))
            })?;

        validation::validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

// `/events/{id}`
#[derive(Debug, Clone, Copy)]
pub struct EventIdParam(pub i64);

impl<S> FromRequestParts<S> for EventIdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid event ID"))?;

        validation::parse_event_id(&raw).map(EventIdParam)
    }
}

// `/users/{user_id}/bookings`
#[derive(Debug, Clone)]
pub struct UserIdParam(pub String);

impl<S> FromRequestParts<S> for UserIdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid user ID"))?;

        validation::check_user_id(&raw)?;
        Ok(UserIdParam(raw))
    }
}
