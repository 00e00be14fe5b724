//! MCP Server implementation
use std::collections::VecDeque;
use std::sync::Arc;

use insurance_service::EligibilityService;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::error::{McpError, McpResult};
use crate::insurance_tools::register_insurance_tools;
use crate::protocol::{methods, McpRequest, McpResponse, ToolInput, PROTOCOL_VERSION};
use crate::session::Session;
use crate::tools::{ToolContext, ToolsRegistry};
use crate::transport::Transport;

pub const SERVER_NAME: &str = "eligibility-mcp";

/// MCP Server for one voice session
pub struct Server {
    tools: ToolsRegistry,
    context: ToolContext,
}

impl Server {
    /// Create a server exposing the eligibility tools over `service`
    pub fn new(service: Arc<EligibilityService>) -> Self {
        info!("Initializing MCP Server");

        let mut tools = ToolsRegistry::new();
        register_insurance_tools(&mut tools);

        Self {
            tools,
            context: ToolContext::new(service),
        }
    }

    pub fn tools(&self) -> &ToolsRegistry {
        &self.tools
    }

    pub fn session(&self) -> &Session {
        &self.context.session
    }

    /// Read requests until the transport closes, answering each in turn.
    ///
    /// While a request is in flight the transport keeps being read, so a
    /// closed peer ends the session (and cancels the lookup) right away.
    pub async fn serve<T: Transport>(&self, transport: &mut T) -> McpResult<()> {
        info!(tools = self.tools.len(), "mcp_server_started");

        let mut queued: VecDeque<String> = VecDeque::new();
        let mut closed = false;

        loop {
            let line = match queued.pop_front() {
                Some(line) => line,
                None if closed => break,
                None => match transport.read_message().await? {
                    Some(line) => line,
                    None => break,
                },
            };
            if line.trim().is_empty() {
                continue;
            }

            let handling = self.handle_message(&line);
            tokio::pin!(handling);
            let response = loop {
                if closed {
                    break (&mut handling).await;
                }
                tokio::select! {
                    response = &mut handling => break response,
                    next = transport.read_message() => match next? {
                        Some(next) => queued.push_back(next),
                        None => {
                            info!("mcp_transport_closed_mid_request");
                            self.session().end();
                            closed = true;
                        }
                    },
                }
            };

            if let Some(response) = response {
                transport.write_message(&response).await?;
            }
        }

        info!("mcp_transport_closed");
        self.session().end();
        Ok(())
    }

    /// Handle one raw line; `None` when no reply is due
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => self.handle_request(request).await?,
            Err(e) => {
                let err = McpError::from_request_error(e);
                warn!(error = %err, code = err.rpc_code(), "mcp_request_rejected");
                McpResponse::failure(None, err.to_protocol_error())
            }
        };

        match serde_json::to_string(&response) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                error!(error = %e, "mcp_response_encoding_failed");
                None
            }
        }
    }

    /// Handle an MCP request; notifications get no response
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                info!("mcp_client_initialized");
            } else {
                debug!(method = %request.method, "mcp_notification");
            }
            return None;
        }

        let id = request.id.clone();
        let response = match self.dispatch(request).await {
            Ok(result) => McpResponse::success(id, result),
            Err(e) => {
                warn!(error = %e, code = e.rpc_code(), "mcp_request_failed");
                McpResponse::failure(id, e.to_protocol_error())
            }
        };
        Some(response)
    }

    async fn dispatch(&self, request: McpRequest) -> McpResult<Value> {
        match request.method.as_str() {
            methods::INITIALIZE => Ok(self.handle_initialize()),
            methods::PING => Ok(json!({})),
            methods::LIST_TOOLS => Ok(json!({ "tools": self.tools.list() })),
            methods::CALL_TOOL => {
                let input: ToolInput = serde_json::from_value(request.params)
                    .map_err(|e| McpError::InvalidParams(e.to_string()))?;
                let result = self.tools.execute(input, &self.context).await?;
                Ok(serde_json::to_value(result)?)
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {}
            }
        })
    }
}
