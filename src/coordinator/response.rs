use serde_json::{Map, Value};
use tracing::error;

use crate::coordinator::error::SubmitError;
use crate::transport::http::HttpResponse;

/// Rendered when the response has no usable content.
pub const NO_DATA_PLACEHOLDER: &str = "No data received";

/// Turn a raw response into the markup to render, or the error to report.
///
/// Content is read from `content_field` when the body has that key, and from
/// the first key in document order otherwise.
pub fn interpret(response: &HttpResponse, content_field: Option<&str>) -> Result<String, SubmitError> {
    if !response.is_success() {
        error!(status = response.status, body = %response.body, "API error");
        return Err(SubmitError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }

    let data = decode_object(&response.body)?;

    if let Some(message) = data.get("error").and_then(error_message) {
        return Err(SubmitError::Application(message));
    }

    Ok(select_content(&data, content_field))
}

fn decode_object(body: &str) -> Result<Map<String, Value>, SubmitError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SubmitError::Decode(format!("Invalid JSON response: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SubmitError::Decode(format!(
            "Expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// A truthy `error` value becomes the message; falsy ones are ignored.
fn error_message(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Pick the content to render from a decoded response.
pub fn select_content(data: &Map<String, Value>, content_field: Option<&str>) -> String {
    let value = content_field
        .and_then(|field| data.get(field))
        .or_else(|| data.values().next());

    match value {
        Some(v) if is_truthy(v) => match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => NO_DATA_PLACEHOLDER.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
