//! Generation 1: five all-caps markers, `- item` lines, `SESSION_END:` footer.

use super::{apply_header, EncodeContext, SessionCodec, END_PREFIX, OVERVIEW_PREFIX};
use crate::record::SessionRecord;
use once_cell::sync::Lazy;
use regex::Regex;

const ITEM_PREFIX: &str = "- ";

static FLAT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z_]*:$").expect("valid flat marker regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlatSection {
    WorkCompleted,
    KeyDecisions,
    EntitiesWorked,
    NextSteps,
    OpenQuestions,
}

const FLAT_SECTIONS: [(&str, FlatSection); 5] = [
    ("WORK_COMPLETED:", FlatSection::WorkCompleted),
    ("KEY_DECISIONS:", FlatSection::KeyDecisions),
    ("ENTITIES_WORKED:", FlatSection::EntitiesWorked),
    ("NEXT_STEPS:", FlatSection::NextSteps),
    ("OPEN_QUESTIONS:", FlatSection::OpenQuestions),
];

impl FlatSection {
    fn items(self, record: &SessionRecord) -> &[String] {
        match self {
            FlatSection::WorkCompleted => &record.progress_tracking.completed,
            FlatSection::KeyDecisions => &record.decision_log,
            FlatSection::EntitiesWorked => &record.relationship_tracking.entities_modified,
            FlatSection::NextSteps => &record.future_planning.next_steps,
            FlatSection::OpenQuestions => &record.future_planning.open_questions,
        }
    }

    fn items_mut(self, record: &mut SessionRecord) -> &mut Vec<String> {
        match self {
            FlatSection::WorkCompleted => &mut record.progress_tracking.completed,
            FlatSection::KeyDecisions => &mut record.decision_log,
            FlatSection::EntitiesWorked => &mut record.relationship_tracking.entities_modified,
            FlatSection::NextSteps => &mut record.future_planning.next_steps,
            FlatSection::OpenQuestions => &mut record.future_planning.open_questions,
        }
    }

    fn from_marker(line: &str) -> Option<Self> {
        FLAT_SECTIONS
            .iter()
            .find(|(marker, _)| *marker == line)
            .map(|(_, section)| *section)
    }
}

/// Flat (generation 1) codec
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatCodec;

impl SessionCodec for FlatCodec {
    fn encode(&self, record: &SessionRecord, ctx: &EncodeContext) -> Vec<String> {
        let mut lines = vec![format!("{OVERVIEW_PREFIX} {}", record.overview)];
        for (marker, section) in FLAT_SECTIONS {
            lines.push(String::new());
            lines.push(marker.to_string());
            lines.extend(
                section
                    .items(record)
                    .iter()
                    .map(|item| format!("{ITEM_PREFIX}{item}")),
            );
        }
        lines.push(String::new());
        lines.push(format!("{END_PREFIX} {}", ctx.ended_at));
        super::finalize_lines(lines)
    }

    fn decode<S: AsRef<str>>(&self, lines: &[S]) -> SessionRecord {
        let mut record = SessionRecord::default();
        let mut seen_overview = false;
        let mut current: Option<FlatSection> = None;

        for line in lines {
            let line = line.as_ref();
            if apply_header(line, &mut record, &mut seen_overview) {
                continue;
            }
            if FLAT_MARKER.is_match(line) {
                // Unknown markers close the current section.
                current = FlatSection::from_marker(line);
                continue;
            }
            if let (Some(item), Some(section)) = (line.strip_prefix(ITEM_PREFIX), current) {
                section.items_mut(&mut record).push(item.to_string());
            }
        }

        record
    }
}
