use memento_session::{Generation, SessionRecord};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request for the `record_session` tool (full structured record).
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordSessionRequest {
    #[serde(flatten)]
    pub record: SessionRecord,

    #[schemars(
        description = "Name of the session this one continues (defaults to relationshipTracking.previousSession)"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continues_from: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSessionResult {
    pub success: bool,
    pub session_name: String,
    pub session_date: String,
    pub generation: Generation,
    pub counts: BTreeMap<String, usize>,
    pub relations_created: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn camel_case_payload_maps_onto_record() {
        let request: RecordSessionRequest = serde_json::from_value(serde_json::json!({
            "overview": "Fixed bug",
            "decisionLog": ["Use X"],
            "progressTracking": { "nextActions": ["Ship Y"] },
            "relationshipTracking": { "previousSession": "Chat Session 2025-01-01 10:00:00" },
            "continuesFrom": "Chat Session 2025-01-02 10:00:00"
        }))
        .unwrap();

        let RecordSessionRequest {
            record,
            continues_from,
        } = request;
        assert_eq!(record.overview, "Fixed bug");
        assert_eq!(record.decision_log, vec!["Use X"]);
        assert_eq!(record.progress_tracking.next_actions, vec!["Ship Y"]);
        assert_eq!(
            record.relationship_tracking.previous_session.as_deref(),
            Some("Chat Session 2025-01-01 10:00:00")
        );
        assert_eq!(continues_from.as_deref(), Some("Chat Session 2025-01-02 10:00:00"));
    }

    #[test]
    fn missing_overview_deserializes_as_blank() {
        let request: RecordSessionRequest =
            serde_json::from_value(serde_json::json!({ "decisionLog": ["Use X"] })).unwrap();
        assert_eq!(request.record.overview, "");
        assert_eq!(request.continues_from, None);
    }

    #[test]
    fn input_schema_exposes_record_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(RecordSessionRequest)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["overview", "decisionLog", "progressTracking", "continuesFrom"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
