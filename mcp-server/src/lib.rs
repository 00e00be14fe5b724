//! Model Context Protocol (MCP) server for insurance eligibility checks
//!
//! Exposes the eligibility pipeline to a voice agent as six named tools over
//! JSON-RPC on stdio. The agent's LLM decides which tool to call next; this
//! crate only keeps the session's collected data and runs the requested stage.
//!
//! # Architecture
//!
//! The MCP server acts as a bridge between:
//! - The voice agent (JSON-RPC requests, one per line on stdin)
//! - The eligibility pipeline in `insurance-service`
//! - The STEDI clearinghouse, reached only through that pipeline
//!
//! # Example Session
//!
//! ```text
//! → {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"collect_member_id","arguments":{"member_id":"A E T N A one two three four five"}}}
//! ← {"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"I have member ID: A E T N A 1 2 3 4 5. Is that correct?"}],...}}
//! ```

pub mod error;
pub mod insurance_tools;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;
pub mod transport;

pub use error::{McpError, McpResult};
pub use protocol::*;
pub use server::*;
pub use session::{Session, SessionState};
pub use tools::*;
pub use transport::*;
