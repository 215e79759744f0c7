use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;

/// JSON body extractor that also accepts requests without a `Content-Type`
/// header. A header naming another media type is still rejected with 415.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(header::CONTENT_TYPE) {
            req.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
