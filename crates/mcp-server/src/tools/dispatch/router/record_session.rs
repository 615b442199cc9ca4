use super::super::{CallToolResult, McpError, MementoService};
use super::error::{json_result, tool_error};
use crate::tools::schemas::record_session::{RecordSessionRequest, RecordSessionResult};
use memento_session::Generation;

/// Hierarchical write of a full session record.
pub(in crate::tools::dispatch) async fn record_session(
    service: &MementoService,
    request: RecordSessionRequest,
) -> Result<CallToolResult, McpError> {
    let RecordSessionRequest {
        record,
        continues_from,
    } = request;

    let recorded = match service
        .journal()
        .record(record, continues_from.as_deref(), Generation::Hierarchical)
        .await
    {
        Ok(recorded) => recorded,
        Err(err) => return Ok(tool_error("recording session", err)),
    };

    let message = format!("Session recorded as \"{}\".", recorded.session_name);
    json_result(&RecordSessionResult {
        success: true,
        session_name: recorded.session_name,
        session_date: recorded.session_date,
        generation: recorded.generation,
        counts: recorded.item_counts,
        relations_created: recorded.relations_created,
        message,
    })
}
