// Per-tool dispatch functions used by the MCP tool router.

pub(super) mod create_session_summary;
pub(super) mod error;
pub(super) mod get_last_session;
pub(super) mod record_session;
