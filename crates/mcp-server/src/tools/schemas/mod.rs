pub(crate) mod create_session_summary;
pub(crate) mod get_last_session;
pub(crate) mod record_session;
