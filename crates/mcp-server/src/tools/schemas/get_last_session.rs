use memento_session::{Generation, SessionRecord};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

pub(crate) const NOT_FOUND_MESSAGE: &str = "No previous chat sessions found.";
pub(crate) const FOUND_MESSAGE: &str = "Would you like to continue from where we left off?";

/// Request for the `get_last_session` tool.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Default)]
pub struct GetLastSessionRequest {
    /// Ignored; accepted for clients that cannot send an empty argument object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_string: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GetLastSessionResult {
    Found(FoundSession),
    NotFound { found: bool, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundSession {
    pub found: bool,
    pub session_name: String,
    pub entity_type: String,
    /// Store-assigned creation time, unix milliseconds
    pub created_at: i64,
    pub session_date: String,
    pub generation: Generation,
    pub summary: SessionRecord,
    pub worked_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continued_from: Option<String>,
    pub formatted_summary: String,
    pub message: String,
}

impl GetLastSessionResult {
    pub fn not_found() -> Self {
        GetLastSessionResult::NotFound {
            found: false,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn found_payload_carries_store_metadata() {
        let found = GetLastSessionResult::Found(FoundSession {
            found: true,
            session_name: "Chat Session 2025-01-01 10:00:00".into(),
            entity_type: "chat_session_summary".into(),
            created_at: 1_735_725_600_000,
            session_date: "2025-01-01T10:00:00.000Z".into(),
            generation: Generation::Flat,
            summary: SessionRecord::new("Fixed bug"),
            worked_on: vec![],
            continued_from: None,
            formatted_summary: String::new(),
            message: FOUND_MESSAGE.into(),
        });
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["entityType"], "chat_session_summary");
        assert_eq!(value["createdAt"], 1_735_725_600_000_i64);
        assert_eq!(value["generation"], "flat");
        assert!(value.get("continuedFrom").is_none());
    }

    #[test]
    fn not_found_payload_is_flag_and_message() {
        let value = serde_json::to_value(GetLastSessionResult::not_found()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "found": false, "message": NOT_FOUND_MESSAGE })
        );
    }
}
