//! MCP tools registry
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use insurance_service::EligibilityService;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{McpError, McpResult};
use crate::protocol::{Tool, ToolInput, ToolResult};
use crate::session::Session;

/// Shared state every tool call runs against
pub struct ToolContext {
    pub service: Arc<EligibilityService>,
    pub session: Session,
}

impl ToolContext {
    pub fn new(service: Arc<EligibilityService>) -> Self {
        Self {
            service,
            session: Session::new(),
        }
    }
}

/// Trait for MCP tool implementations
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Get tool name
    fn name(&self) -> &str;

    /// Get tool description
    fn description(&self) -> &str;

    /// Get input schema (JSON Schema)
    fn input_schema(&self) -> Value;

    /// Execute the tool.
    ///
    /// Failures the caller should hear about come back as
    /// [`ToolResult::error`]; `Err` is reserved for malformed arguments.
    async fn execute(&self, arguments: Value, context: &ToolContext) -> McpResult<ToolResult>;
}

/// Decode tool arguments, treating a missing object as empty
pub fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> McpResult<T> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Registry of available tools, listed in name order
#[derive(Default)]
pub struct ToolsRegistry {
    tools: BTreeMap<String, Box<dyn McpTool>>,
}

impl ToolsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all available tools
    pub fn list(&self) -> Vec<Tool> {
        self.tools
            .values()
            .map(|t| Tool {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name
    pub async fn execute(&self, input: ToolInput, context: &ToolContext) -> McpResult<ToolResult> {
        debug!(tool = %input.name, "executing_tool");
        match self.tools.get(&input.name) {
            Some(tool) => tool.execute(input.arguments, context).await,
            None => Err(McpError::Tool(format!("Tool '{}' not found", input.name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        member_id: Option<String>,
    }

    #[test]
    fn test_parse_arguments_accepts_null() {
        let args: Args = parse_arguments(Value::Null).unwrap();
        assert!(args.member_id.is_none());
    }

    #[test]
    fn test_parse_arguments_rejects_wrong_types() {
        let err = parse_arguments::<Args>(json!({ "member_id": 12 })).unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }
}
