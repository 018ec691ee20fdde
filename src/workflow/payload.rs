use serde_json::{Map, Value};

use crate::workflow::workflow_model::{FieldKind, FieldSpec, FormInputs, InputValue, WorkflowConfig};

/// Build the JSON request body for a workflow from its current inputs.
///
/// Keys appear in the order the workflow lists its fields. Optional fields
/// fall back to their default when the control is absent or empty. A required
/// field whose control is absent is left out entirely; the server is the one
/// that rejects it.
pub fn build_payload(config: &WorkflowConfig, inputs: &FormInputs) -> Map<String, Value> {
    let mut payload = Map::new();

    for field in &config.fields {
        let raw = inputs.get(&field.control);
        if let Some(value) = field_value(field, raw) {
            payload.insert(field.payload_field.clone(), value);
        }
    }

    payload
}

fn field_value(field: &FieldSpec, raw: Option<&InputValue>) -> Option<Value> {
    let present = raw.filter(|v| field.required || !v.is_empty());

    let Some(raw) = present else {
        return field.default.clone();
    };

    let value = match field.kind {
        FieldKind::Text => match raw {
            InputValue::Text(s) => Value::String(s.clone()),
            // A multi-select read as text yields its first selection
            InputValue::Many(v) => Value::String(v.first().cloned().unwrap_or_default()),
        },
        FieldKind::Integer => {
            let text = match raw {
                InputValue::Text(s) => s.as_str(),
                InputValue::Many(v) => v.first().map(String::as_str).unwrap_or(""),
            };
            parse_leading_int(text).map(Value::from).unwrap_or(Value::Null)
        }
        FieldKind::List => match raw {
            InputValue::Many(v) => Value::from(v.clone()),
            InputValue::Text(s) => Value::from(vec![s.clone()]),
        },
    };

    Some(value)
}

/// Parse the leading integer of a string: `" 12abc"` is 12, `"abc"` is `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
