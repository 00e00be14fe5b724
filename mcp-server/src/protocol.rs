//! MCP protocol definitions (JSON-RPC 2.0, one message per line)
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// MCP revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version
    #[serde(default = "default_jsonrpc_version")]
    pub jsonrpc: String,
    /// Request ID; absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

impl McpRequest {
    pub fn new(id: impl Into<Value>, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id: Some(id.into()),
            method: method.to_string(),
            params,
        }
    }

    /// Notifications carry no id and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn default_jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    /// JSON-RPC version
    #[serde(default = "default_jsonrpc_version")]
    pub jsonrpc: String,
    /// Request ID (echoes request, `null` when it could not be read)
    pub id: Value,
    /// Result payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpProtocolError>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: McpProtocolError) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(error),
        }
    }
}

/// MCP JSON-RPC error structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpProtocolError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP tool definition as listed by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON Schema)
    pub input_schema: Value,
}

/// `tools/call` parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// Content block inside a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Tool execution result.
///
/// `content` carries the sentence the agent should speak; `structured_content`
/// carries the full `{ status, message, ... }` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result; the payload's `message` becomes the text content
    pub fn success(payload: Value) -> Self {
        let text = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| payload.to_string());
        Self {
            content: vec![ToolContent::Text { text }],
            structured_content: Some(payload),
            is_error: false,
        }
    }

    /// Failed result carrying a user-facing sentence
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            structured_content: None,
            is_error: true,
        }
    }

    /// Failed result that also names the stable error code
    pub fn coded_error(error_code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut result = Self::error(message.clone());
        result.structured_content = Some(serde_json::json!({
            "status": "error",
            "error_code": error_code,
            "message": message,
        }));
        result
    }

    /// First text block
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ToolContent::Text { text } => Some(text.as_str()),
        })
    }

    /// `status` field of the structured payload
    pub fn status(&self) -> Option<&str> {
        self.structured_content
            .as_ref()
            .and_then(|payload| payload.get("status"))
            .and_then(Value::as_str)
    }
}

/// List of supported MCP methods
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const LIST_TOOLS: &str = "tools/list";
    pub const CALL_TOOL: &str = "tools/call";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_id_is_notification() {
        let request: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(request.is_notification());
        assert_eq!(request.params, Value::Null);
    }

    #[test]
    fn test_numeric_and_string_ids_round_trip() {
        let request: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        let response = McpResponse::success(request.id, json!({}));
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["id"], 7);
        assert!(encoded.get("error").is_none());

        let response = McpResponse::success(Some(json!("abc")), json!({}));
        assert_eq!(serde_json::to_value(&response).unwrap()["id"], "abc");
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let result = ToolResult::success(json!({ "status": "active", "message": "Coverage is active" }));
        let encoded = serde_json::to_value(&result).unwrap();
        assert_eq!(encoded["content"][0]["type"], "text");
        assert_eq!(encoded["content"][0]["text"], "Coverage is active");
        assert_eq!(encoded["structuredContent"]["status"], "active");
        assert_eq!(encoded["isError"], false);

        let failed = ToolResult::error("Please provide your member ID.");
        assert!(failed.is_error);
        assert_eq!(failed.text(), Some("Please provide your member ID."));
        assert_eq!(failed.status(), None);

        let coded = ToolResult::coded_error("ELIG_2005", "No eligibility data found.");
        let encoded = serde_json::to_value(&coded).unwrap();
        assert_eq!(encoded["isError"], true);
        assert_eq!(encoded["content"][0]["text"], "No eligibility data found.");
        assert_eq!(encoded["structuredContent"]["error_code"], "ELIG_2005");
        assert_eq!(coded.status(), Some("error"));
    }

    #[test]
    fn test_tool_definition_uses_camel_case_schema_key() {
        let tool = Tool {
            name: "ping".into(),
            description: "d".into(),
            input_schema: json!({ "type": "object" }),
        };
        let encoded = serde_json::to_value(&tool).unwrap();
        assert!(encoded.get("inputSchema").is_some());
    }
}
