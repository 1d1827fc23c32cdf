//! Extractor JSON con validación
//!
//! Los cuerpos mal formados y los que no pasan `validator` se responden
//! con el sobre de error 422 en lugar del texto plano de axum.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::{validation_error, AppError};

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| validation_error("body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
