use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_path_to_error::Segment;

use crate::error::{ApiError, FieldError, LocSegment};

/// JSON body extractor whose every decoding failure becomes a 422 listing the
/// path of the offending field, e.g. `["body", "history", 0, "date"]`.
///
/// Decoding stops at the first offending value, so `detail` carries exactly
/// one entry even when several fields are wrong.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !json_content_type(req.headers()) {
            return Err(ApiError::Validation(vec![FieldError {
                loc: vec!["body".into()],
                msg: "Expected request with `Content-Type: application/json`".to_string(),
                kind: "content_type".to_string(),
            }]));
        }
        let bytes = Bytes::from_request(req, state).await?;
        decode(&bytes).map(ValidatedJson)
    }
}

fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Decodes a whole JSON document, tracking the path to the first failing value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut *de)
        .map_err(|err| ApiError::Validation(vec![field_error(&err)]))?;
    de.end().map_err(|err| ApiError::Validation(vec![syntax_error(&err)]))?;
    Ok(value)
}

fn field_error(err: &serde_path_to_error::Error<serde_json::Error>) -> FieldError {
    let inner = err.inner();
    if matches!(inner.classify(), Category::Syntax | Category::Eof | Category::Io) {
        return syntax_error(inner);
    }

    let mut loc: Vec<LocSegment> = vec!["body".into()];
    for segment in err.path().iter() {
        match segment {
            Segment::Seq { index } => loc.push((*index).into()),
            Segment::Map { key } => loc.push(key.as_str().into()),
            Segment::Enum { variant } => loc.push(variant.as_str().into()),
            Segment::Unknown => {}
        }
    }

    let message = strip_position(&inner.to_string());
    if let Some(field) = missing_field(&message) {
        loc.push(field.into());
        return FieldError { loc, msg: "Field required".to_string(), kind: "missing".to_string() };
    }

    let kind = if message.starts_with("invalid type") {
        "invalid_type"
    } else {
        "value_error"
    };
    FieldError { loc, msg: message, kind: kind.to_string() }
}

fn syntax_error(err: &serde_json::Error) -> FieldError {
    FieldError {
        loc: vec!["body".into()],
        msg: format!("JSON decode error: {err}"),
        kind: "json_invalid".to_string(),
    }
}

// serde_json appends "at line L column C" to data errors
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.strip_suffix('`')
}
