//! The set of tools advertised by the tool host.

use std::collections::HashSet;

use rmcp::model::Tool;
use tracing::warn;

use crate::{Error, Result};

/// Ordered tool list with lookup by name. Never empty.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
    names: HashSet<String>,
}

impl ToolCatalog {
    /// Build a catalog from a discovery result.
    ///
    /// Fails with [`Error::NoToolsAvailable`] for an empty list. When a name
    /// repeats, the first definition wins.
    pub fn new(discovered: Vec<Tool>) -> Result<Self> {
        let mut tools = Vec::with_capacity(discovered.len());
        let mut names = HashSet::with_capacity(discovered.len());

        for tool in discovered {
            if !names.insert(tool.name.to_string()) {
                warn!(tool = %tool.name, "duplicate tool name in catalog, keeping the first");
                continue;
            }
            tools.push(tool);
        }

        if tools.is_empty() {
            return Err(Error::NoToolsAvailable);
        }

        Ok(Self { tools, names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Tools in discovery order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};
    use std::sync::Arc;

    fn tool(name: &'static str, description: &'static str) -> Tool {
        let mut schema = Map::new();
        schema.insert("type".into(), Value::from("object"));
        Tool::new(name, description, Arc::new(schema))
    }

    #[test]
    fn empty_discovery_is_no_tools() {
        assert!(matches!(
            ToolCatalog::new(Vec::new()),
            Err(Error::NoToolsAvailable)
        ));
    }

    #[test]
    fn lookup_preserves_order_and_first_duplicate() {
        let catalog = ToolCatalog::new(vec![
            tool("create-contact", "first"),
            tool("list-deals", "deals"),
            tool("create-contact", "second"),
        ])
        .unwrap();

        let names: Vec<_> = catalog.tools().iter().map(|t| &*t.name).collect();
        assert_eq!(names, ["create-contact", "list-deals"]);
        assert_eq!(catalog.tools()[0].description.as_deref(), Some("first"));
        assert!(catalog.contains("list-deals"));
        assert!(!catalog.contains("delete-everything"));
    }
}
