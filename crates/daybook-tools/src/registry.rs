//! Registry for tool implementations.

use crate::tool::Tool;
use daybook_protocol::FunctionSchema;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory registry for tool implementations.
///
/// The schema list it produces is part of the wire contract sent with
/// every classification call, so registration and dispatch always agree.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    /// Map of tool name to implementation.
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool by name.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        debug!("registering tool (name={})", tool.name());
        self.tools.write().insert(tool.name().to_string(), tool);
    }

    /// Fetch a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// List all registered tool names.
    pub fn list(&self) -> Vec<String> {
        self.tools.read().keys().cloned().collect()
    }

    /// Return wire-format schemas for all registered tools, sorted by
    /// name for a stable classification payload.
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        let mut schemas: Vec<FunctionSchema> = self
            .tools
            .read()
            .values()
            .map(|tool| tool.schema())
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

#[cfg(test)]
mod tests {
    use super::ToolRegistry;
    use crate::reply::ToolReply;
    use crate::{Tool, ToolContext};
    use async_trait::async_trait;
    use daybook_protocol::ToolError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug)]
    struct DummyTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for DummyTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "dummy"
        }

        fn args_schema(&self) -> serde_json::Value {
            json!({ "type": "object", "properties": {} })
        }

        async fn call(
            &self,
            _ctx: &ToolContext,
            _args: serde_json::Value,
        ) -> Result<ToolReply, ToolError> {
            Ok(ToolReply::assistant("ok"))
        }
    }

    #[test]
    fn registry_tracks_tools_and_schemas() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(DummyTool { name: "saveMemory" }));
        registry.register(Arc::new(DummyTool {
            name: "checkCalendar",
        }));

        let mut names = registry.list();
        names.sort();
        assert_eq!(names, vec!["checkCalendar", "saveMemory"]);

        let schemas = registry.schemas();
        let schema_names: Vec<String> = schemas.into_iter().map(|schema| schema.name).collect();
        assert_eq!(schema_names, vec!["checkCalendar", "saveMemory"]);
    }
}
