//! System prompt describing the tool catalog.

use std::fmt::Write;

use crate::tools::ToolCatalog;

const PREAMBLE: &str = "You are a helpful assistant that can take actions for the user \
with the tools listed below. Keep replies short and friendly.";

const INSTRUCTIONS: &str = r#"When one of these tools would accomplish what the user asked, reply with a brief sentence describing what you are doing and include exactly one JSON object of this form in your reply:
{"useTool": true, "toolName": "<tool name>", "toolArguments": {<arguments matching the tool's input schema>}}
Only use tool names from the list above. Request at most one tool per reply.
If no tool is needed, answer normally and do not include that JSON object."#;

/// Render the system prompt for a catalog.
pub fn system_prompt(catalog: &ToolCatalog) -> String {
    let mut prompt = format!("{PREAMBLE}\n\nAvailable tools:\n");

    for tool in catalog.tools() {
        let schema = serde_json::to_string_pretty(&*tool.input_schema).unwrap_or_default();
        let description = tool.description.as_deref().unwrap_or("");
        let _ = write!(
            prompt,
            "\n## {}\n{description}\nInput schema:\n{schema}\n",
            tool.name
        );
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Tool;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn schema(value: Value) -> Arc<serde_json::Map<String, Value>> {
        match value {
            Value::Object(map) => Arc::new(map),
            _ => unreachable!("schemas are objects"),
        }
    }

    #[test]
    fn prompt_lists_every_tool_and_the_convention() {
        let mut list_deals = Tool::new("list-deals", "", schema(json!({})));
        list_deals.description = None;
        let catalog = ToolCatalog::new(vec![
            Tool::new(
                "create-contact",
                "Create a CRM contact",
                schema(json!({"type": "object", "properties": {"name": {"type": "string"}}})),
            ),
            list_deals,
        ])
        .unwrap();

        let prompt = system_prompt(&catalog);
        assert!(prompt.contains("## create-contact\nCreate a CRM contact\n"));
        assert!(prompt.contains("\"name\": {"));
        assert!(prompt.contains("## list-deals\n"));
        assert!(prompt.contains(r#""useTool": true"#));
        assert!(prompt.find("create-contact") < prompt.find("list-deals"));
    }
}
