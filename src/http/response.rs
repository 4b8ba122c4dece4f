//! HTTP response serialization.
//!
//! Every outcome is answered with a complete one-shot response: status
//! line, JSON body, `Connection: close`. Write failures are swallowed;
//! the connection is torn down either way.

use bytes::BytesMut;
use serde_json::Value;
use std::io::Write;
use tracing::debug;

/// Response for one request/response cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: &'static str,
    pub body: Value,
}

impl ApiResponse {
    /// Build a response from a status code, reason phrase, and JSON body.
    pub fn new(status: u16, reason: &'static str, body: Value) -> Self {
        ApiResponse {
            status,
            reason,
            body,
        }
    }

    /// Serialize to wire format.
    ///
    /// Lines are CRLF-joined; Content-Length is the exact byte length of
    /// the encoded body. serde_json leaves forward slashes unescaped, so
    /// commands containing paths render literally.
    pub fn encode(&self) -> BytesMut {
        let body = self.body.to_string();
        let mut out = BytesMut::with_capacity(body.len() + 128);

        out.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", self.status, self.reason).as_bytes());
        out.extend_from_slice(b"Content-Type: application/json\r\n");
        out.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
        out.extend_from_slice(b"Connection: close\r\n");
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(body.as_bytes());
        out
    }

    /// Write the response to the client, best-effort.
    ///
    /// The connection is one-shot and closed right after, so a failed or
    /// partial write is logged and dropped rather than retried.
    pub fn write_to<W: Write>(&self, stream: &mut W) {
        if let Err(e) = stream.write_all(&self.encode()) {
            debug!(status = self.status, error = %e, "Response write failed");
        }
    }
}
