//! Request parser for the command endpoint.
//!
//! Deliberately minimal: split the raw bytes at the first blank line,
//! require a POST request line, keep everything else untouched. No header
//! beyond the request line is inspected: Content-Length is not validated
//! and a request is assumed to arrive in one read.

/// Header/body separator.
const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Parsed request, alive for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// Method token from the request line.
    pub method: String,
    /// Raw header lines, request line first.
    pub header_lines: Vec<String>,
    /// Body bytes, handed to the JSON decoder untouched.
    pub body: Vec<u8>,
}

/// Request parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No header/body separator found.
    Malformed,
    /// Request line is not a POST.
    MethodNotAllowed,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Malformed => write!(f, "malformed request"),
            ParseError::MethodNotAllowed => write!(f, "method not allowed"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a raw request buffer into header lines and body.
///
/// The request line must start with the exact literal `POST `; matching
/// is case-sensitive and the trailing space is required.
pub fn parse(raw: &[u8]) -> Result<ParsedRequest, ParseError> {
    let split = find_separator(raw).ok_or(ParseError::Malformed)?;
    let head = &raw[..split];
    let body = &raw[split + SEPARATOR.len()..];

    if !head.starts_with(b"POST ") {
        return Err(ParseError::MethodNotAllowed);
    }

    let header_lines: Vec<String> = String::from_utf8_lossy(head)
        .split("\r\n")
        .map(str::to_string)
        .collect();
    let method = header_lines
        .first()
        .and_then(|line| line.split_whitespace().next())
        .unwrap_or_default()
        .to_string();

    Ok(ParsedRequest {
        method,
        header_lines,
        body: body.to_vec(),
    })
}

/// Find the first `\r\n\r\n` in the buffer.
fn find_separator(raw: &[u8]) -> Option<usize> {
    raw.windows(SEPARATOR.len()).position(|w| w == SEPARATOR)
}
