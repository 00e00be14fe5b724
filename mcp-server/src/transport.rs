//! Transport layer for MCP (newline-delimited JSON)
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::McpResult;

/// MCP Transport abstraction
#[async_trait]
pub trait Transport: Send {
    /// Read the next message; `None` once the peer has closed.
    ///
    /// Must be cancel safe: the server races this against in-flight
    /// requests, and a read dropped part-way resumes on the next call.
    async fn read_message(&mut self) -> McpResult<Option<String>>;

    /// Write one message
    async fn write_message(&mut self, message: &str) -> McpResult<()>;
}

/// One JSON message per line over any async reader/writer pair
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    /// Bytes of a line whose newline has not arrived yet
    partial: Vec<u8>,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            partial: Vec::new(),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// stdin/stdout transport used when launched by an agent
pub type StdioTransport = LineTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_message(&mut self) -> McpResult<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.partial).await?;
        if read == 0 && self.partial.is_empty() {
            return Ok(None);
        }
        let bytes = std::mem::take(&mut self.partial);
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn write_message(&mut self, message: &str) -> McpResult<()> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
