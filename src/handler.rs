//! Request handling for the command endpoint.
//!
//! One linear validation chain: parse, decode, validate, dispatch. Every
//! branch terminates in a complete HTTP response. Dispatch happens before
//! the 200 is written but the response does not reflect execution outcome.

use crate::executor::CommandGate;
use crate::http::parser::{self, ParseError};
use crate::http::response::ApiResponse;
use serde_json::{json, Value};

/// Handle one raw request buffer, producing the response to write back.
pub fn handle(raw: &[u8], gate: &CommandGate) -> ApiResponse {
    let request = match parser::parse(raw) {
        Ok(request) => request,
        Err(ParseError::Malformed) => {
            return ApiResponse::new(400, "Bad Request", json!({"error": "Malformed request"}));
        }
        Err(ParseError::MethodNotAllowed) => {
            return ApiResponse::new(
                405,
                "Method Not Allowed",
                json!({"error": "POST required"}),
            );
        }
    };

    let data = match serde_json::from_slice::<Value>(request.body.trim_ascii()) {
        Ok(Value::Object(map)) => map,
        _ => return ApiResponse::new(400, "Bad Request", json!({"error": "Invalid JSON"})),
    };

    let command = match data.get("command").and_then(Value::as_str) {
        Some(command) => command,
        None => {
            return ApiResponse::new(
                422,
                "Unprocessable Entity",
                json!({"error": "Missing command"}),
            );
        }
    };

    let command = command.trim();
    if command.is_empty() {
        return ApiResponse::new(
            422,
            "Unprocessable Entity",
            json!({"error": "Empty command"}),
        );
    }

    gate.dispatch(command);

    ApiResponse::new(200, "OK", json!({"status": "executed", "command": command}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::RecordingExecutor;
    use crate::executor::CommandGate;
    use std::sync::Arc;

    fn recording_gate() -> (CommandGate, Arc<RecordingExecutor>) {
        let executor = RecordingExecutor::new();
        (CommandGate::new(executor.clone()), executor)
    }

    #[test]
    fn test_valid_command_executes() {
        let (gate, executor) = recording_gate();
        let raw = b"POST / HTTP/1.1\r\nHost: x\r\n\r\n{\"command\":\"say hi\"}";

        let response = handle(raw, &gate);

        assert_eq!(response.status, 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(
            response.body,
            json!({"status": "executed", "command": "say hi"})
        );
        assert_eq!(*executor.commands.lock().unwrap(), vec!["say hi"]);
    }

    #[test]
    fn test_get_method_rejected() {
        let (gate, executor) = recording_gate();

        let response = handle(b"GET / HTTP/1.1\r\n\r\n{}", &gate);

        assert_eq!(response.status, 405);
        assert_eq!(response.body, json!({"error": "POST required"}));
        assert!(executor.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\nHost: x", &gate);

        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": "Malformed request"}));
    }

    #[test]
    fn test_non_json_body_rejected() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\nnot-json", &gate);

        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": "Invalid JSON"}));
    }

    #[test]
    fn test_top_level_array_rejected() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\n[\"command\"]", &gate);

        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": "Invalid JSON"}));
    }

    #[test]
    fn test_empty_body_rejected() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\n", &gate);

        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": "Invalid JSON"}));
    }

    #[test]
    fn test_missing_command_field() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\n{\"other\":\"x\"}", &gate);

        assert_eq!(response.status, 422);
        assert_eq!(response.body, json!({"error": "Missing command"}));
    }

    #[test]
    fn test_non_string_command_field() {
        let (gate, _) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\n{\"command\":42}", &gate);

        assert_eq!(response.status, 422);
        assert_eq!(response.body, json!({"error": "Missing command"}));
    }

    #[test]
    fn test_whitespace_command_rejected() {
        let (gate, executor) = recording_gate();

        let response = handle(b"POST / HTTP/1.1\r\n\r\n{\"command\":\"   \"}", &gate);

        assert_eq!(response.status, 422);
        assert_eq!(response.body, json!({"error": "Empty command"}));
        assert!(executor.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_command_is_trimmed() {
        let (gate, executor) = recording_gate();

        let response = handle(
            b"POST / HTTP/1.1\r\n\r\n{\"command\":\"  stop \\n\"}",
            &gate,
        );

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({"status": "executed", "command": "stop"})
        );
        assert_eq!(*executor.commands.lock().unwrap(), vec!["stop"]);
    }

    #[test]
    fn test_path_and_headers_ignored() {
        let (gate, _) = recording_gate();
        let raw = b"POST /some/other/path HTTP/1.1\r\nAuthorization: none\r\nX-Junk: 1\r\n\r\n{\"command\":\"list\"}";

        let response = handle(raw, &gate);

        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_body_whitespace_tolerated() {
        let (gate, _) = recording_gate();
        let raw = b"POST / HTTP/1.1\r\n\r\n  {\"command\":\"list\"} \r\n";

        let response = handle(raw, &gate);

        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_command_with_slashes_survives() {
        let (gate, executor) = recording_gate();
        let raw = b"POST / HTTP/1.1\r\n\r\n{\"command\":\"tp /world/spawn\"}";

        let response = handle(raw, &gate);

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({"status": "executed", "command": "tp /world/spawn"})
        );
        assert_eq!(*executor.commands.lock().unwrap(), vec!["tp /world/spawn"]);
    }

    #[test]
    fn test_repeat_requests_dispatch_independently() {
        let (gate, executor) = recording_gate();
        let raw = b"POST / HTTP/1.1\r\n\r\n{\"command\":\"save-all\"}";

        let first = handle(raw, &gate);
        let second = handle(raw, &gate);

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(
            *executor.commands.lock().unwrap(),
            vec!["save-all", "save-all"]
        );
    }
}
