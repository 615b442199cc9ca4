use memento_session::SessionRecord;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_OVERVIEW: &str = "No overview provided";

/// Request for the `create_session_summary` tool (flat summary, historical argument names).
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionSummaryRequest {
    #[schemars(description = "Brief one-line summary of the main achievement in this session")]
    pub session_overview: Option<String>,

    #[schemars(description = "List of specific tasks or changes made during the session")]
    #[serde(default)]
    pub work_completed: Vec<String>,

    #[schemars(description = "Important choices or configurations decided in the session")]
    #[serde(default)]
    pub key_decisions: Vec<String>,

    #[schemars(description = "Names of entities created or modified during the session")]
    #[serde(default)]
    pub entities_worked: Vec<String>,

    #[schemars(description = "What should be done in the next session")]
    #[serde(default)]
    pub next_steps: Vec<String>,

    #[schemars(description = "Any unresolved issues or pending decisions")]
    #[serde(default)]
    pub open_questions: Vec<String>,

    #[schemars(description = "Optional: Name of previous session this continues from")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continues_from: Option<String>,
}

impl CreateSessionSummaryRequest {
    pub fn overview(&self) -> &str {
        self.session_overview
            .as_deref()
            .filter(|overview| !overview.trim().is_empty())
            .unwrap_or(DEFAULT_OVERVIEW)
    }

    pub fn to_record(&self) -> SessionRecord {
        let mut record = SessionRecord::new(self.overview());
        record.progress_tracking.completed = self.work_completed.clone();
        record.decision_log = self.key_decisions.clone();
        record.relationship_tracking.entities_modified = self.entities_worked.clone();
        record.future_planning.next_steps = self.next_steps.clone();
        record.future_planning.open_questions = self.open_questions.clone();
        record
    }

    pub fn counts(&self) -> SummaryCounts {
        SummaryCounts {
            overview: self.overview().to_string(),
            work_completed: self.work_completed.len(),
            key_decisions: self.key_decisions.len(),
            entities_worked: self.entities_worked.len(),
            next_steps: self.next_steps.len(),
            open_questions: self.open_questions.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub overview: String,
    pub work_completed: usize,
    pub key_decisions: usize,
    pub entities_worked: usize,
    pub next_steps: usize,
    pub open_questions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionSummaryResult {
    pub success: bool,
    pub session_name: String,
    pub summary: SummaryCounts,
    pub relations_created: usize,
    pub message: String,
}
