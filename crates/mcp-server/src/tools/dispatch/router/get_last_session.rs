use super::super::{CallToolResult, McpError, MementoService};
use super::error::{json_result, tool_error};
use crate::tools::schemas::get_last_session::{
    FoundSession, GetLastSessionRequest, GetLastSessionResult, FOUND_MESSAGE,
};

/// Read side: latest session record, decoded whatever its generation, plus its digest.
pub(in crate::tools::dispatch) async fn get_last_session(
    service: &MementoService,
    _request: GetLastSessionRequest,
) -> Result<CallToolResult, McpError> {
    let last = match service.journal().last_session().await {
        Ok(last) => last,
        Err(err) => return Ok(tool_error("retrieving last session", err)),
    };

    let result = match last {
        None => GetLastSessionResult::not_found(),
        Some(last) => GetLastSessionResult::Found(FoundSession {
            found: true,
            session_name: last.session_name,
            entity_type: last.entity_type,
            created_at: last.created_at,
            session_date: last.session_date,
            generation: last.generation,
            summary: last.record,
            worked_on: last.worked_on,
            continued_from: last.continued_from,
            formatted_summary: last.formatted_summary,
            message: FOUND_MESSAGE.to_string(),
        }),
    };
    json_result(&result)
}
