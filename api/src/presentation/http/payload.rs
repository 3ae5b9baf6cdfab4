use std::collections::BTreeMap;

use axum::extract::{FromRequest, Request};
use axum::{Form, body::Bytes};
use serde_json::{Map, Value};

use super::errors::ApiError;

/// Request body as loose JSON, for the validators to check field by field.
///
/// Accepts `application/json` and `application/x-www-form-urlencoded`. An
/// empty body reads as `{}` so missing fields surface as `required` errors.
#[derive(Debug)]
pub struct Payload(pub Value);

#[axum::async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<BTreeMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidJson(e.body_text()))?;
            let object: Map<String, Value> = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Payload(Value::Object(object)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidJson(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(Value::Object(Map::new())));
        }
        serde_json::from_slice(&bytes)
            .map(Payload)
            .map_err(|e| ApiError::InvalidJson(e.to_string()))
    }
}
