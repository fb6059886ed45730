//! Query-string extraction with validation
//!
//! `ValidatedQuery<T>` deserializes the query string like `Query<T>` and then
//! runs the `validator` rules declared on `T`. Both failures answer 422.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;
use weather_core::model::describe_validation_errors;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::Validation(describe_validation_errors(&e)))?;

        Ok(Self(value))
    }
}
