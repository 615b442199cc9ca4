use super::super::{CallToolResult, Content, McpError};
use serde::Serialize;
use std::fmt::Display;

/// Single human-readable failure line, prefixed by the operation
pub(in crate::tools::dispatch) fn tool_error(operation: &str, err: impl Display) -> CallToolResult {
    let message = format!("Error {operation}: {err}");
    log::warn!("{message}");
    CallToolResult::error(vec![Content::text(message)])
}

/// Pretty JSON payload as the tool's only text item
pub(in crate::tools::dispatch) fn json_result<T: Serialize>(
    payload: &T,
) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(payload)
        .map_err(|err| McpError::internal_error(format!("serialize tool result: {err}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
