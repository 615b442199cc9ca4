//! MCP tool dispatch for Memento

use super::schemas::create_session_summary::CreateSessionSummaryRequest;
use super::schemas::get_last_session::GetLastSessionRequest;
use super::schemas::record_session::RecordSessionRequest;
use memento_graph::MemoryGraphStore;
use memento_session::SessionJournal;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use std::sync::Arc;

mod router;

/// Memento MCP Service
#[derive(Clone)]
pub struct MementoService {
    /// Session journal over the shared graph store
    journal: Arc<SessionJournal<MemoryGraphStore>>,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl MementoService {
    pub fn new(store: MemoryGraphStore, environment: impl Into<String>) -> Self {
        Self {
            journal: Arc::new(SessionJournal::new(store).with_environment(environment)),
            tool_router: Self::tool_router(),
        }
    }

    pub(in crate::tools::dispatch) fn journal(&self) -> &SessionJournal<MemoryGraphStore> {
        &self.journal
    }
}

#[tool_router]
impl MementoService {
    /// Save a flat session summary
    #[tool(
        description = "Create a comprehensive summary of the current chat session for seamless continuity"
    )]
    pub async fn create_session_summary(
        &self,
        Parameters(request): Parameters<CreateSessionSummaryRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::create_session_summary::create_session_summary(self, request).await
    }

    /// Save a full structured session record
    #[tool(
        description = "Record a structured session (metadata, technical changes, knowledge, decisions, context, relationships, progress, quality, learning, future planning) so a later chat can resume it"
    )]
    pub async fn record_session(
        &self,
        Parameters(request): Parameters<RecordSessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::record_session::record_session(self, request).await
    }

    /// Restore the latest session
    #[tool(
        description = "Retrieve the most recent chat session summary for context restoration"
    )]
    pub async fn get_last_session(
        &self,
        Parameters(request): Parameters<GetLastSessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::get_last_session::get_last_session(self, request).await
    }
}

#[tool_handler]
impl ServerHandler for MementoService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Memento keeps continuity between chat sessions. Call 'get_last_session' at the start of a new chat to restore context, and 'create_session_summary' (or 'record_session' for a full structured record) before the chat ends.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
