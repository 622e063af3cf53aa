use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Map, Value};

use crate::error::CodexError;
use crate::types::payloads::RawBody;

/// Request body accepted as a JSON object or as a URL-encoded form.
///
/// Only the shape is checked here; field types are decoded by the service once
/// it has resolved ownership. Bodies over the router's size limit keep their 413.
pub struct Payload(pub RawBody);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn rejected(status: StatusCode, body_text: String) -> CodexError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CodexError::PayloadTooLarge
    } else {
        CodexError::BadRequest(body_text)
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = CodexError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
            // blank fields count as absent; repeated keys: last one wins
            let map: Map<String, Value> = pairs
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(Self(RawBody::new(map)));
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
        match value {
            Value::Object(map) => Ok(Self(RawBody::new(map))),
            _ => Err(CodexError::bad_request("Expected a JSON object")),
        }
    }
}
