//! Validating dispatcher for provider-returned function calls.

use crate::context::ToolContext;
use crate::registry::ToolRegistry;
use crate::reply::ToolReply;
use daybook_protocol::ToolError;
use log::{debug, warn};
use serde_json::Value;

/// Dispatches `(name, arguments)` pairs from the classification call to
/// the matching registered tool.
///
/// Arguments are parsed and checked against the schema's `required` list
/// before the tool runs; a failure here is fatal for the turn and never
/// reaches the tool.
#[derive(Clone)]
pub struct FunctionDispatcher {
    registry: ToolRegistry,
}

impl FunctionDispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// The registry backing this dispatcher.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Validate and run one function call.
    pub async fn dispatch(
        &self,
        ctx: &ToolContext,
        name: &str,
        arguments: &str,
    ) -> Result<ToolReply, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::ToolNotFound(name.to_string()))?;

        let args: Value = serde_json::from_str(arguments).map_err(|err| {
            warn!("malformed tool arguments (name={name}): {err}");
            ToolError::InvalidArguments(format!("arguments are not valid JSON: {err}"))
        })?;
        validate_required(&tool.args_schema(), &args)?;

        debug!("dispatching tool call (name={name})");
        tool.call(ctx, args).await
    }
}

/// Ensure every field in the schema's `required` list is present.
fn validate_required(schema: &Value, args: &Value) -> Result<(), ToolError> {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Ok(());
    };
    let object = args.as_object().ok_or_else(|| {
        ToolError::InvalidArguments("arguments must be a JSON object".to_string())
    })?;
    for field in required.iter().filter_map(Value::as_str) {
        if !object.contains_key(field) {
            return Err(ToolError::InvalidArguments(format!(
                "missing required field: {field}"
            )));
        }
    }
    Ok(())
}
