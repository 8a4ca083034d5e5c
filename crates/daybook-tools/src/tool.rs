//! Tool trait definition.

use crate::context::ToolContext;
use crate::reply::ToolReply;
use async_trait::async_trait;
use daybook_protocol::{FunctionSchema, ToolError};
use serde_json::Value;
use std::fmt::Debug;

/// Interface for dispatchable tools.
#[async_trait]
pub trait Tool: Send + Sync + Debug {
    /// Return the tool name as the classification model selects it.
    fn name(&self) -> &str;
    /// Return the tool description sent with every classification call.
    fn description(&self) -> &str;
    /// Return the JSON schema for tool arguments.
    fn args_schema(&self) -> Value;

    /// Invoke the tool with a context and parsed arguments.
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolReply, ToolError>;

    /// Build the wire-format function schema for this tool.
    fn schema(&self) -> FunctionSchema {
        FunctionSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.args_schema(),
        }
    }
}
