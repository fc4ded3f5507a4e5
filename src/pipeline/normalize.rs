//! Response normalizer: flattens text or structured capability output.

use crate::capabilities::CapabilityOutput;
use crate::error::DispatchError;
use crate::intent::Category;
use crate::pipeline::types::NormalizedResponse;

/// Side fields carried from a structured payload into the envelope.
pub const PASSTHROUGH_FIELDS: [&str; 3] = ["prompts", "calendar", "caption"];

/// Flatten capability output for the response envelope.
///
/// Structured payloads must be JSON objects with a string `response` field;
/// anything else is a malformed payload and fails the dispatch.
pub fn normalize(
    category: Category,
    output: &CapabilityOutput,
) -> Result<NormalizedResponse, DispatchError> {
    let object = match output {
        CapabilityOutput::Text(text) => {
            return Ok(NormalizedResponse {
                response: text.clone(),
                ..Default::default()
            });
        }
        CapabilityOutput::Structured(serde_json::Value::Object(object)) => object,
        CapabilityOutput::Structured(other) => {
            return Err(DispatchError::MalformedOutput {
                category,
                reason: format!("expected a JSON object, got {}", json_kind(other)),
            });
        }
    };

    let response = object
        .get("response")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| DispatchError::MalformedOutput {
            category,
            reason: "missing string 'response' field".to_string(),
        })?
        .to_string();

    let field = |name: &str| object.get(name).filter(|v| !v.is_null()).cloned();

    Ok(NormalizedResponse {
        response,
        prompts: field(PASSTHROUGH_FIELDS[0]),
        calendar: field(PASSTHROUGH_FIELDS[1]),
        caption: field(PASSTHROUGH_FIELDS[2]),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
