//! Generation 2: ten numbered sections with labelled subsections.
//!
//! ```text
//! SESSION_OVERVIEW: <overview>
//! 1. CORE_METADATA:
//! - Session ID:
//!   * <value>
//! ...
//! 4. DECISION_LOG:
//! - <decision>
//! ...
//! SESSION_END: <timestamp>
//! ```
//!
//! Decoding is a two-level state machine, see [`DecoderState`].

use super::{apply_header, EncodeContext, SessionCodec, END_PREFIX, OVERVIEW_PREFIX};
use crate::record::SessionRecord;
use once_cell::sync::Lazy;
use regex::Regex;

const CONTENT_PREFIX: &str = "  * ";
const BULLET_PREFIX: &str = "- ";

static NUMBERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\. [A-Z][A-Z_]*:$").expect("valid section marker regex"));

/// `N. NAME:` (any number, any all-caps name)
pub(crate) fn is_numbered_marker(line: &str) -> bool {
    NUMBERED_MARKER.is_match(line)
}

/// Top-level section of the hierarchical layout, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    CoreMetadata,
    TechnicalContent,
    KnowledgeTracking,
    DecisionLog,
    ContextPreservation,
    RelationshipTracking,
    ProgressTracking,
    QualityMetrics,
    LearningAndDocs,
    FuturePlanning,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::CoreMetadata,
        Section::TechnicalContent,
        Section::KnowledgeTracking,
        Section::DecisionLog,
        Section::ContextPreservation,
        Section::RelationshipTracking,
        Section::ProgressTracking,
        Section::QualityMetrics,
        Section::LearningAndDocs,
        Section::FuturePlanning,
    ];

    /// 1-based position on the wire
    pub fn number(self) -> usize {
        match self {
            Section::CoreMetadata => 1,
            Section::TechnicalContent => 2,
            Section::KnowledgeTracking => 3,
            Section::DecisionLog => 4,
            Section::ContextPreservation => 5,
            Section::RelationshipTracking => 6,
            Section::ProgressTracking => 7,
            Section::QualityMetrics => 8,
            Section::LearningAndDocs => 9,
            Section::FuturePlanning => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::CoreMetadata => "CORE_METADATA",
            Section::TechnicalContent => "TECHNICAL_CONTENT",
            Section::KnowledgeTracking => "KNOWLEDGE_TRACKING",
            Section::DecisionLog => "DECISION_LOG",
            Section::ContextPreservation => "CONTEXT_PRESERVATION",
            Section::RelationshipTracking => "RELATIONSHIP_TRACKING",
            Section::ProgressTracking => "PROGRESS_TRACKING",
            Section::QualityMetrics => "QUALITY_METRICS",
            Section::LearningAndDocs => "LEARNING_AND_DOCS",
            Section::FuturePlanning => "FUTURE_PLANNING",
        }
    }

    /// Marker line, e.g. `4. DECISION_LOG:`
    pub fn marker(self) -> String {
        format!("{}. {}:", self.number(), self.name())
    }

    /// Exact match against the ten known markers
    pub fn from_marker(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.marker() == line)
    }

    /// Subsections in wire order
    pub fn slots(self) -> impl Iterator<Item = (&'static str, Slot)> {
        SUBSECTIONS
            .iter()
            .filter(move |(section, _, _)| *section == self)
            .map(|(_, label, slot)| (*label, *slot))
    }
}

/// Record field a subsection writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    SessionId,
    StartTime,
    EndTime,
    Duration,
    SessionType,
    Environment,
    ModifiedFiles,
    CommandsRun,
    BuildResults,
    ErrorLogs,
    Discussions,
    ProblemsSolved,
    SolutionsImplemented,
    Branch,
    GitStatus,
    PackageVersion,
    PreviousSession,
    EntitiesModified,
    ToolsUsed,
    Completed,
    NextActions,
    CodeReview,
    TestCoverage,
    NewConcepts,
    DocsUpdates,
    NextSteps,
    OpenQuestions,
    Improvements,
}

/// Subsection table keyed by the active section; labels are only unique per section.
const SUBSECTIONS: &[(Section, &str, Slot)] = &[
    (Section::CoreMetadata, "- Session ID:", Slot::SessionId),
    (Section::CoreMetadata, "- Start Time:", Slot::StartTime),
    (Section::CoreMetadata, "- End Time:", Slot::EndTime),
    (Section::CoreMetadata, "- Duration:", Slot::Duration),
    (Section::CoreMetadata, "- Session Type:", Slot::SessionType),
    (Section::CoreMetadata, "- Environment:", Slot::Environment),
    (Section::TechnicalContent, "- Modified Files:", Slot::ModifiedFiles),
    (Section::TechnicalContent, "- Commands Run:", Slot::CommandsRun),
    (Section::TechnicalContent, "- Build Results:", Slot::BuildResults),
    (Section::TechnicalContent, "- Error Logs:", Slot::ErrorLogs),
    (Section::KnowledgeTracking, "- Discussions:", Slot::Discussions),
    (Section::KnowledgeTracking, "- Problems Solved:", Slot::ProblemsSolved),
    (
        Section::KnowledgeTracking,
        "- Solutions Implemented:",
        Slot::SolutionsImplemented,
    ),
    (Section::ContextPreservation, "- Branch:", Slot::Branch),
    (Section::ContextPreservation, "- Git Status:", Slot::GitStatus),
    (
        Section::ContextPreservation,
        "- Package Version:",
        Slot::PackageVersion,
    ),
    (
        Section::RelationshipTracking,
        "- Previous Session:",
        Slot::PreviousSession,
    ),
    (
        Section::RelationshipTracking,
        "- Entities Modified:",
        Slot::EntitiesModified,
    ),
    (Section::RelationshipTracking, "- Tools Used:", Slot::ToolsUsed),
    (Section::ProgressTracking, "- Completed:", Slot::Completed),
    (Section::ProgressTracking, "- Next Actions:", Slot::NextActions),
    (Section::QualityMetrics, "- Code Review:", Slot::CodeReview),
    (Section::QualityMetrics, "- Test Coverage:", Slot::TestCoverage),
    (Section::LearningAndDocs, "- New Concepts:", Slot::NewConcepts),
    (Section::LearningAndDocs, "- Docs Updates:", Slot::DocsUpdates),
    (Section::FuturePlanning, "- Next Steps:", Slot::NextSteps),
    (Section::FuturePlanning, "- Open Questions:", Slot::OpenQuestions),
    (Section::FuturePlanning, "- Improvements:", Slot::Improvements),
];

enum Target<'r> {
    Scalar(&'r mut Option<String>),
    Sequence(&'r mut Vec<String>),
}

impl Slot {
    pub fn lookup(section: Section, label: &str) -> Option<Slot> {
        SUBSECTIONS
            .iter()
            .find(|(s, l, _)| *s == section && *l == label)
            .map(|(_, _, slot)| *slot)
    }

    fn target(self, record: &mut SessionRecord) -> Target<'_> {
        let meta = &mut record.core_metadata;
        match self {
            Slot::SessionId => Target::Scalar(&mut meta.session_id),
            Slot::StartTime => Target::Scalar(&mut meta.start_time),
            Slot::EndTime => Target::Scalar(&mut meta.end_time),
            Slot::Duration => Target::Scalar(&mut meta.duration),
            Slot::SessionType => Target::Scalar(&mut meta.session_type),
            Slot::Environment => Target::Scalar(&mut meta.environment),
            Slot::ModifiedFiles => Target::Sequence(&mut record.technical_content.modified_files),
            Slot::CommandsRun => Target::Sequence(&mut record.technical_content.commands_run),
            Slot::BuildResults => Target::Sequence(&mut record.technical_content.build_results),
            Slot::ErrorLogs => Target::Sequence(&mut record.technical_content.error_logs),
            Slot::Discussions => Target::Sequence(&mut record.knowledge_tracking.discussions),
            Slot::ProblemsSolved => {
                Target::Sequence(&mut record.knowledge_tracking.problems_solved)
            }
            Slot::SolutionsImplemented => {
                Target::Sequence(&mut record.knowledge_tracking.solutions_implemented)
            }
            Slot::Branch => Target::Scalar(&mut record.context_preservation.branch),
            Slot::GitStatus => Target::Sequence(&mut record.context_preservation.git_status),
            Slot::PackageVersion => {
                Target::Scalar(&mut record.context_preservation.package_version)
            }
            Slot::PreviousSession => {
                Target::Scalar(&mut record.relationship_tracking.previous_session)
            }
            Slot::EntitiesModified => {
                Target::Sequence(&mut record.relationship_tracking.entities_modified)
            }
            Slot::ToolsUsed => Target::Sequence(&mut record.relationship_tracking.tools_used),
            Slot::Completed => Target::Sequence(&mut record.progress_tracking.completed),
            Slot::NextActions => Target::Sequence(&mut record.progress_tracking.next_actions),
            Slot::CodeReview => Target::Sequence(&mut record.quality_metrics.code_review),
            Slot::TestCoverage => Target::Sequence(&mut record.quality_metrics.test_coverage),
            Slot::NewConcepts => Target::Sequence(&mut record.learning_and_docs.new_concepts),
            Slot::DocsUpdates => Target::Sequence(&mut record.learning_and_docs.docs_updates),
            Slot::NextSteps => Target::Sequence(&mut record.future_planning.next_steps),
            Slot::OpenQuestions => Target::Sequence(&mut record.future_planning.open_questions),
            Slot::Improvements => Target::Sequence(&mut record.future_planning.improvements),
        }
    }

    /// Store one content line; scalars keep their first value
    fn accept(self, record: &mut SessionRecord, value: &str) {
        match self.target(record) {
            Target::Scalar(slot) => {
                if slot.is_none() {
                    *slot = Some(value.to_string());
                }
            }
            Target::Sequence(items) => items.push(value.to_string()),
        }
    }

    fn values<'r>(self, record: &'r SessionRecord, ctx: &'r EncodeContext) -> Vec<&'r str> {
        let meta = &record.core_metadata;
        let scalar = |value: &'r Option<String>| -> Vec<&'r str> { value.as_deref().into_iter().collect() };
        let sequence =
            |items: &'r [String]| -> Vec<&'r str> { items.iter().map(String::as_str).collect() };
        match self {
            Slot::SessionId => scalar(&meta.session_id),
            Slot::StartTime => scalar(&meta.start_time),
            Slot::EndTime => scalar(&meta.end_time),
            Slot::Duration => scalar(&meta.duration),
            Slot::SessionType => scalar(&meta.session_type),
            Slot::Environment => match meta.environment.as_deref() {
                Some(environment) => vec![environment],
                None => ctx.environment.as_deref().into_iter().collect(),
            },
            Slot::ModifiedFiles => sequence(&record.technical_content.modified_files),
            Slot::CommandsRun => sequence(&record.technical_content.commands_run),
            Slot::BuildResults => sequence(&record.technical_content.build_results),
            Slot::ErrorLogs => sequence(&record.technical_content.error_logs),
            Slot::Discussions => sequence(&record.knowledge_tracking.discussions),
            Slot::ProblemsSolved => sequence(&record.knowledge_tracking.problems_solved),
            Slot::SolutionsImplemented => {
                sequence(&record.knowledge_tracking.solutions_implemented)
            }
            Slot::Branch => scalar(&record.context_preservation.branch),
            Slot::GitStatus => sequence(&record.context_preservation.git_status),
            Slot::PackageVersion => scalar(&record.context_preservation.package_version),
            Slot::PreviousSession => scalar(&record.relationship_tracking.previous_session),
            Slot::EntitiesModified => sequence(&record.relationship_tracking.entities_modified),
            Slot::ToolsUsed => sequence(&record.relationship_tracking.tools_used),
            Slot::Completed => sequence(&record.progress_tracking.completed),
            Slot::NextActions => sequence(&record.progress_tracking.next_actions),
            Slot::CodeReview => sequence(&record.quality_metrics.code_review),
            Slot::TestCoverage => sequence(&record.quality_metrics.test_coverage),
            Slot::NewConcepts => sequence(&record.learning_and_docs.new_concepts),
            Slot::DocsUpdates => sequence(&record.learning_and_docs.docs_updates),
            Slot::NextSteps => sequence(&record.future_planning.next_steps),
            Slot::OpenQuestions => sequence(&record.future_planning.open_questions),
            Slot::Improvements => sequence(&record.future_planning.improvements),
        }
    }
}

/// `(section, subsection)` decoder state.
///
/// Transitions, checked in order:
///
/// | line                 | effect                                                        |
/// |----------------------|---------------------------------------------------------------|
/// | `N. NAME:`           | section = known marker or unset; subsection unset             |
/// | `  * value`          | push into the active subsection (dropped when either is unset) |
/// | `- Label:`           | subsection = label of the active section or unset             |
/// | `- item`             | push into the decision log when that section is active        |
/// | anything else        | no-op                                                         |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderState {
    pub section: Option<Section>,
    pub subsection: Option<Slot>,
}

impl DecoderState {
    /// Consume one body line (header/footer lines are handled by the caller)
    pub fn feed(&mut self, line: &str, record: &mut SessionRecord) {
        if is_numbered_marker(line) {
            self.section = Section::from_marker(line);
            self.subsection = None;
            return;
        }

        if let Some(value) = line.strip_prefix(CONTENT_PREFIX) {
            if let (Some(_), Some(slot)) = (self.section, self.subsection) {
                slot.accept(record, value);
            }
            return;
        }

        if let Some(item) = line.strip_prefix(BULLET_PREFIX) {
            if line.ends_with(':') {
                self.subsection = self
                    .section
                    .and_then(|section| Slot::lookup(section, line));
            } else if self.section == Some(Section::DecisionLog) {
                record.decision_log.push(item.to_string());
            }
        }
    }
}

/// Hierarchical (generation 2) codec
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalCodec;

impl SessionCodec for HierarchicalCodec {
    fn encode(&self, record: &SessionRecord, ctx: &EncodeContext) -> Vec<String> {
        let mut lines = vec![format!("{OVERVIEW_PREFIX} {}", record.overview)];

        for section in Section::ALL {
            lines.push(String::new());
            lines.push(section.marker());

            if section == Section::DecisionLog {
                lines.extend(
                    record
                        .decision_log
                        .iter()
                        .map(|item| format!("{BULLET_PREFIX}{item}")),
                );
                continue;
            }

            for (label, slot) in section.slots() {
                lines.push(label.to_string());
                lines.extend(
                    slot.values(record, ctx)
                        .into_iter()
                        .map(|value| format!("{CONTENT_PREFIX}{value}")),
                );
            }
        }

        lines.push(String::new());
        lines.push(format!("{END_PREFIX} {}", ctx.ended_at));
        super::finalize_lines(lines)
    }

    fn decode<S: AsRef<str>>(&self, lines: &[S]) -> SessionRecord {
        let mut record = SessionRecord::default();
        let mut seen_overview = false;
        let mut state = DecoderState::default();

        for line in lines {
            let line = line.as_ref();
            if !apply_header(line, &mut record, &mut seen_overview) {
                state.feed(line, &mut record);
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> EncodeContext {
        EncodeContext::new("2025-01-01T10:30:00.000Z")
    }

    #[test]
    fn every_section_has_a_unique_marker() {
        for section in Section::ALL {
            assert!(is_numbered_marker(&section.marker()), "{section:?}");
            assert_eq!(Section::from_marker(&section.marker()), Some(section));
        }
        assert_eq!(Section::from_marker("11. EXTRA:"), None);
        assert!(!is_numbered_marker("WORK_COMPLETED:"));
        assert!(!is_numbered_marker("1. lower:"));
    }

    #[test]
    fn labels_resolve_only_within_their_section() {
        assert_eq!(
            Slot::lookup(Section::ProgressTracking, "- Completed:"),
            Some(Slot::Completed)
        );
        assert_eq!(Slot::lookup(Section::FuturePlanning, "- Completed:"), None);
        assert_eq!(
            Slot::lookup(Section::FuturePlanning, "- Next Steps:"),
            Some(Slot::NextSteps)
        );
        assert_eq!(Section::DecisionLog.slots().count(), 0);
    }

    #[test]
    fn state_transitions_follow_the_table() {
        let mut record = SessionRecord::default();
        let mut state = DecoderState::default();

        state.feed("  * orphan", &mut record);
        assert_eq!(state, DecoderState::default());

        state.feed("7. PROGRESS_TRACKING:", &mut record);
        assert_eq!(state.section, Some(Section::ProgressTracking));
        assert_eq!(state.subsection, None);

        state.feed("  * before any label", &mut record);
        state.feed("- Next Actions:", &mut record);
        assert_eq!(state.subsection, Some(Slot::NextActions));
        state.feed("  * Ship Y", &mut record);

        state.feed("- Unknown Label:", &mut record);
        assert_eq!(state.subsection, None);
        state.feed("  * dropped", &mut record);

        state.feed("99. NOT_A_SECTION:", &mut record);
        assert_eq!(state, DecoderState::default());
        state.feed("- Completed:", &mut record);
        assert_eq!(state.subsection, None);

        assert_eq!(record.progress_tracking.next_actions, vec!["Ship Y"]);
        assert_eq!(record.total_items(), 1);
    }

    #[test]
    fn encodes_empty_sections_with_their_labels() {
        let lines = HierarchicalCodec.encode(&SessionRecord::new("Quiet day"), &ctx());

        assert_eq!(lines.first().map(String::as_str), Some("SESSION_OVERVIEW: Quiet day"));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("SESSION_END: 2025-01-01T10:30:00.000Z")
        );
        for section in Section::ALL {
            assert!(lines.contains(&section.marker()));
        }
        assert_eq!(lines.iter().filter(|l| l.starts_with(CONTENT_PREFIX)).count(), 0);
    }

    #[test]
    fn environment_falls_back_to_context() {
        let ctx = ctx().with_environment("linux x86_64");

        let decoded = HierarchicalCodec.decode(&HierarchicalCodec.encode(&SessionRecord::new("a"), &ctx));
        assert_eq!(decoded.core_metadata.environment.as_deref(), Some("linux x86_64"));

        let mut record = SessionRecord::new("b");
        record.core_metadata.environment = Some("container".into());
        let decoded = HierarchicalCodec.decode(&HierarchicalCodec.encode(&record, &ctx));
        assert_eq!(decoded.core_metadata.environment.as_deref(), Some("container"));
    }

    #[test]
    fn round_trips_scalars_and_footer() {
        let mut record = SessionRecord::new("Release prep");
        record.core_metadata.session_id = Some("abc-123".into());
        record.core_metadata.session_type = Some("release".into());
        record.context_preservation.branch = Some("main".into());
        record.context_preservation.package_version = Some("0.4.0".into());
        record.relationship_tracking.previous_session =
            Some("Chat Session 2024-12-31 09:00:00".into());

        let decoded = HierarchicalCodec.decode(&HierarchicalCodec.encode(&record, &ctx()));

        let mut expected = record.clone();
        expected.core_metadata.end_time = Some("2025-01-01T10:30:00.000Z".into());
        assert_eq!(decoded, expected);
    }

    #[test]
    fn explicit_end_time_wins_over_footer() {
        let mut record = SessionRecord::new("x");
        record.core_metadata.end_time = Some("2025-01-01T09:00:00Z".into());
        let decoded = HierarchicalCodec.decode(&HierarchicalCodec.encode(&record, &ctx()));
        assert_eq!(
            decoded.core_metadata.end_time.as_deref(),
            Some("2025-01-01T09:00:00Z")
        );
    }

    #[test]
    fn tolerates_unknown_sections_between_known_ones() {
        let lines = [
            "SESSION_OVERVIEW: Mixed",
            "4. DECISION_LOG:",
            "- Use X",
            "12. FROM_THE_FUTURE:",
            "- Something New:",
            "  * ignored",
            "- ignored too",
            "7. PROGRESS_TRACKING:",
            "- Completed:",
            "  * kept",
            "#### stray markdown",
            "  * still kept",
        ];

        let record = HierarchicalCodec.decode(&lines);
        assert_eq!(record.overview, "Mixed");
        assert_eq!(record.decision_log, vec!["Use X"]);
        assert_eq!(record.progress_tracking.completed, vec!["kept", "still kept"]);
        assert_eq!(record.total_items(), 3);
    }

    #[test]
    fn duplicate_scalar_keeps_first_value() {
        let lines = ["5. CONTEXT_PRESERVATION:", "- Branch:", "  * main", "  * dev"];
        let record = HierarchicalCodec.decode(&lines);
        assert_eq!(record.context_preservation.branch.as_deref(), Some("main"));
    }
}
