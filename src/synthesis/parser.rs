use serde_json::{Map, Value};

use super::SynthesisError;

/// Top-level fields of the model's analysis object, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawAnalysis {
    pub recommendations: Vec<Value>,
    pub overall_summary: Option<String>,
    pub risk_factors_identified: Option<Vec<String>>,
    pub suggested_follow_up: Option<String>,
}

/// Parse the model's reply into a [`RawAnalysis`].
///
/// Accepts a bare JSON object or one wrapped in a ```json fence. An empty
/// reply, invalid JSON, or a non-object top level is an error.
pub fn parse_analysis_response(response: &str) -> Result<RawAnalysis, SynthesisError> {
    let json_str = extract_json_object(response)?;
    let value: Value =
        serde_json::from_str(json_str).map_err(|e| SynthesisError::JsonParsing(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(SynthesisError::MalformedResponse(
            "Top-level JSON is not an object".into(),
        ));
    };

    Ok(RawAnalysis {
        recommendations: match object.get("recommendations") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        overall_summary: non_empty_string(&object, "overall_summary"),
        risk_factors_identified: object
            .get("risk_factors_identified")
            .and_then(Value::as_array)
            .map(|items| string_items(items)),
        suggested_follow_up: non_empty_string(&object, "suggested_follow_up"),
    })
}

/// Locate the JSON payload inside a reply.
fn extract_json_object(response: &str) -> Result<&str, SynthesisError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(SynthesisError::EmptyResponse);
    }

    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    if let Some(fence_start) = trimmed.find("```") {
        let after_fence = &trimmed[fence_start + 3..];
        // Skip the info string ("json") up to the end of the line.
        let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        let end = content
            .find("```")
            .ok_or_else(|| SynthesisError::MalformedResponse("Unclosed JSON block".into()))?;
        let inner = content[..end].trim();
        if inner.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        return Ok(inner);
    }

    Ok(trimmed)
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-empty string items of a JSON array; other item types are skipped.
pub fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
