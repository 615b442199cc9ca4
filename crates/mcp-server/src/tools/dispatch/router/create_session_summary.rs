use super::super::{CallToolResult, McpError, MementoService};
use super::error::{json_result, tool_error};
use crate::tools::schemas::create_session_summary::{
    CreateSessionSummaryRequest, CreateSessionSummaryResult,
};
use memento_session::Generation;

const SAVED_MESSAGE: &str = "✅ Session summary saved! When you return, just say \"new chat\" and I'll pick up right where we left off.";

/// Flat summary write: the historical `create_session_summary` contract.
pub(in crate::tools::dispatch) async fn create_session_summary(
    service: &MementoService,
    request: CreateSessionSummaryRequest,
) -> Result<CallToolResult, McpError> {
    let record = request.to_record();
    let continues_from = request.continues_from.as_deref();

    let recorded = match service
        .journal()
        .record(record, continues_from, Generation::Flat)
        .await
    {
        Ok(recorded) => recorded,
        Err(err) => return Ok(tool_error("creating session summary", err)),
    };

    json_result(&CreateSessionSummaryResult {
        success: true,
        session_name: recorded.session_name,
        summary: request.counts(),
        relations_created: recorded.relations_created,
        message: SAVED_MESSAGE.to_string(),
    })
}
