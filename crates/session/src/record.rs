use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured continuity payload.
///
/// Never stored as-is: it only exists transiently between a caller and the line codec.
/// Every sequence keeps caller order; the codec neither sorts nor deduplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    /// One-line summary of the session (required)
    pub overview: String,
    pub core_metadata: CoreMetadata,
    pub technical_content: TechnicalContent,
    pub knowledge_tracking: KnowledgeTracking,
    /// Decisions taken during the session, in order
    pub decision_log: Vec<String>,
    pub context_preservation: ContextPreservation,
    pub relationship_tracking: RelationshipTracking,
    pub progress_tracking: ProgressTracking,
    pub quality_metrics: QualityMetrics,
    pub learning_and_docs: LearningAndDocs,
    pub future_planning: FuturePlanning,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreMetadata {
    pub session_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<String>,
    /// Free-form kind, e.g. "debugging", "feature", "review"
    pub session_type: Option<String>,
    /// Overrides the server's environment description
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalContent {
    pub modified_files: Vec<String>,
    pub commands_run: Vec<String>,
    pub build_results: Vec<String>,
    pub error_logs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeTracking {
    pub discussions: Vec<String>,
    pub problems_solved: Vec<String>,
    pub solutions_implemented: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextPreservation {
    pub branch: Option<String>,
    pub git_status: Vec<String>,
    pub package_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipTracking {
    pub previous_session: Option<String>,
    /// Entity names touched this session; each gets a `worked_on` relation
    pub entities_modified: Vec<String>,
    pub tools_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressTracking {
    pub completed: Vec<String>,
    pub next_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityMetrics {
    pub code_review: Vec<String>,
    pub test_coverage: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningAndDocs {
    pub new_concepts: Vec<String>,
    pub docs_updates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FuturePlanning {
    pub next_steps: Vec<String>,
    pub open_questions: Vec<String>,
    pub improvements: Vec<String>,
}

impl SessionRecord {
    pub fn new(overview: impl Into<String>) -> Self {
        Self {
            overview: overview.into(),
            ..Self::default()
        }
    }

    /// Every sequence field, in declaration order, keyed by its wire name
    pub fn sequences(&self) -> Vec<(&'static str, &[String])> {
        vec![
            ("modifiedFiles", &self.technical_content.modified_files),
            ("commandsRun", &self.technical_content.commands_run),
            ("buildResults", &self.technical_content.build_results),
            ("errorLogs", &self.technical_content.error_logs),
            ("discussions", &self.knowledge_tracking.discussions),
            ("problemsSolved", &self.knowledge_tracking.problems_solved),
            (
                "solutionsImplemented",
                &self.knowledge_tracking.solutions_implemented,
            ),
            ("decisionLog", &self.decision_log),
            ("gitStatus", &self.context_preservation.git_status),
            (
                "entitiesModified",
                &self.relationship_tracking.entities_modified,
            ),
            ("toolsUsed", &self.relationship_tracking.tools_used),
            ("completed", &self.progress_tracking.completed),
            ("nextActions", &self.progress_tracking.next_actions),
            ("codeReview", &self.quality_metrics.code_review),
            ("testCoverage", &self.quality_metrics.test_coverage),
            ("newConcepts", &self.learning_and_docs.new_concepts),
            ("docsUpdates", &self.learning_and_docs.docs_updates),
            ("nextSteps", &self.future_planning.next_steps),
            ("openQuestions", &self.future_planning.open_questions),
            ("improvements", &self.future_planning.improvements),
        ]
    }

    /// Item count per sequence field
    pub fn item_counts(&self) -> Vec<(&'static str, usize)> {
        self.sequences()
            .into_iter()
            .map(|(name, items)| (name, items.len()))
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.sequences().iter().map(|(_, items)| items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_camel_case_payload() {
        let record: SessionRecord = serde_json::from_value(serde_json::json!({
            "overview": "Fixed bug",
            "decisionLog": ["Use X"],
            "progressTracking": { "nextActions": ["Ship Y"] },
            "coreMetadata": { "sessionType": "debugging" }
        }))
        .unwrap();

        assert_eq!(record.overview, "Fixed bug");
        assert_eq!(record.decision_log, vec!["Use X"]);
        assert_eq!(record.progress_tracking.next_actions, vec!["Ship Y"]);
        assert!(record.progress_tracking.completed.is_empty());
        assert_eq!(record.core_metadata.session_type.as_deref(), Some("debugging"));
        assert!(record.context_preservation.branch.is_none());
    }

    #[test]
    fn counts_cover_every_sequence_field() {
        let mut record = SessionRecord::new("x");
        record.decision_log = vec!["a".into(), "b".into()];
        record.future_planning.improvements = vec!["c".into()];

        let counts = record.item_counts();
        assert_eq!(counts.len(), 20);
        assert!(counts.contains(&("decisionLog", 2)));
        assert!(counts.contains(&("improvements", 1)));
        assert_eq!(record.total_items(), 3);
    }
}
