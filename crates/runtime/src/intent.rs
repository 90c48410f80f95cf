//! Tool-invocation intents scraped from free-form completion text.
//!
//! The model is asked to embed an object like
//! `{"useTool": true, "toolName": "...", "toolArguments": {...}}` somewhere
//! in its reply. Anything short of a parseable object with a truthy
//! `useTool` is simply "no intent".

use serde_json::{Map, Value};
use tracing::{debug, warn};

const MARKER: &str = "\"useTool\"";

/// A tool call the model asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationIntent {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

/// Extract the tool-invocation intent from a completion, if it has one.
///
/// Only the first object containing `"useTool"` is considered.
pub fn extract_intent(text: &str) -> Option<ToolInvocationIntent> {
    let span = intent_span(text)?;

    let object = match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return None,
        Err(e) => {
            debug!("ignoring unparseable intent span: {e}");
            return None;
        }
    };

    if !object.get("useTool").is_some_and(is_truthy) {
        return None;
    }

    let Some(tool_name) = object.get("toolName").and_then(Value::as_str) else {
        warn!("intent has useTool set but no toolName");
        return None;
    };

    let arguments = match object.get("toolArguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments.clone(),
        Some(other) => {
            warn!(tool = %tool_name, "ignoring intent with non-object toolArguments: {other}");
            return None;
        }
    };

    Some(ToolInvocationIntent {
        tool_name: tool_name.to_string(),
        arguments,
    })
}

/// The balanced `{...}` span enclosing the first `"useTool"` occurrence,
/// starting from the earliest opening brace that encloses it.
fn intent_span(text: &str) -> Option<&str> {
    let marker = text.find(MARKER)?;

    text[..marker]
        .match_indices('{')
        .filter_map(|(start, _)| Some((start, closing_brace(text, start)?)))
        .find(|&(_, end)| end > marker)
        .map(|(start, end)| &text[start..=end])
}

/// Index of the `}` that balances the `{` at `start`, ignoring braces inside
/// string literals.
fn closing_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Loose truthiness: `false`, `null`, zero and `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
