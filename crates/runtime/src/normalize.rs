//! Turning a tool result into a single user-facing message.

use serde_json::Value;
use tracing::debug;

use crate::tools::ToolInvocationResult;

/// Render what a tool did as one assistant message.
///
/// Text content is joined with single spaces. A brace-delimited text that
/// parses to an object with an `id` becomes a short confirmation; other
/// text is passed through. Results with no usable text, or text that only
/// looks like JSON, get a generic success message.
pub fn normalize_result(tool_name: &str, result: &ToolInvocationResult) -> String {
    let items = match result {
        ToolInvocationResult::Content(items) => items,
        ToolInvocationResult::Opaque(_) => return generic_success(tool_name),
    };

    let text = items
        .iter()
        .filter_map(|item| item.as_text())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return generic_success(tool_name);
    }

    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return text;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(parsed) => match parsed.get("id").and_then(display_id) {
            Some(id) => format!("Done! `{tool_name}` completed successfully (id: {id})."),
            None => text,
        },
        Err(e) => {
            debug!(tool = %tool_name, "tool output looked like JSON but did not parse: {e}");
            generic_success(tool_name)
        }
    }
}

fn generic_success(tool_name: &str) -> String {
    format!("Done! `{tool_name}` completed successfully.")
}

fn display_id(id: &Value) -> Option<String> {
    match id {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
