//! Line codecs for session records.
//!
//! Two generations share one store and carry no version tag; [`detect_generation`]
//! infers the generation from the presence of numbered `N. NAME:` section markers.

mod flat;
mod hierarchical;

use crate::record::SessionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use flat::FlatCodec;
pub use hierarchical::{DecoderState, HierarchicalCodec, Section, Slot};

pub(crate) const OVERVIEW_PREFIX: &str = "SESSION_OVERVIEW:";
pub(crate) const END_PREFIX: &str = "SESSION_END:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// `WORK_COMPLETED:` + `- item`
    Flat,
    /// `N. NAME:` + `- Label:` + `  * item`
    Hierarchical,
}

impl Generation {
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::Flat => "flat",
            Generation::Hierarchical => "hierarchical",
        }
    }

    pub fn encode(self, record: &SessionRecord, ctx: &EncodeContext) -> Vec<String> {
        match self {
            Generation::Flat => FlatCodec.encode(record, ctx),
            Generation::Hierarchical => HierarchicalCodec.encode(record, ctx),
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values an encoder would otherwise pull from the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeContext {
    /// RFC 3339 timestamp written to the `SESSION_END:` footer
    pub ended_at: String,

    /// Environment description used when the record does not carry one
    pub environment: Option<String>,
}

impl EncodeContext {
    pub fn new(ended_at: impl Into<String>) -> Self {
        Self {
            ended_at: ended_at.into(),
            environment: None,
        }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self::new(crate::naming::format_timestamp(now))
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

/// One line-encoding generation
pub trait SessionCodec {
    /// Encode a record; the output never contains empty lines
    fn encode(&self, record: &SessionRecord, ctx: &EncodeContext) -> Vec<String>;

    /// Decode lines; total, unknown lines are dropped
    fn decode<S: AsRef<str>>(&self, lines: &[S]) -> SessionRecord;
}

/// Decoded record plus the generation it was read as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub generation: Generation,
    pub record: SessionRecord,
}

/// Drop blank separator lines before persistence
pub fn finalize_lines(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().filter(|line| !line.is_empty()).collect()
}

pub fn detect_generation<S: AsRef<str>>(lines: &[S]) -> Generation {
    if lines
        .iter()
        .any(|line| hierarchical::is_numbered_marker(line.as_ref()))
    {
        Generation::Hierarchical
    } else {
        Generation::Flat
    }
}

/// Decode lines of either generation
pub fn decode<S: AsRef<str>>(lines: &[S]) -> SessionRecord {
    decode_with_generation(lines).record
}

pub fn decode_with_generation<S: AsRef<str>>(lines: &[S]) -> Decoded {
    let generation = detect_generation(lines);
    let record = match generation {
        Generation::Flat => FlatCodec.decode(lines),
        Generation::Hierarchical => HierarchicalCodec.decode(lines),
    };
    Decoded { generation, record }
}

/// `SESSION_OVERVIEW: text` → `text` (the space after the colon is optional)
pub(crate) fn strip_overview(line: &str) -> Option<&str> {
    strip_header(line, OVERVIEW_PREFIX)
}

pub(crate) fn strip_end(line: &str) -> Option<&str> {
    strip_header(line, END_PREFIX)
}

fn strip_header<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Header/footer handling shared by both decoders. Returns true when the line was consumed.
pub(crate) fn apply_header(
    line: &str,
    record: &mut SessionRecord,
    seen_overview: &mut bool,
) -> bool {
    if let Some(overview) = strip_overview(line) {
        if !*seen_overview {
            record.overview = overview.to_string();
            *seen_overview = true;
        }
        return true;
    }
    if let Some(ended_at) = strip_end(line) {
        if record.core_metadata.end_time.is_none() {
            record.core_metadata.end_time = Some(ended_at.to_string());
        }
        return true;
    }
    false
}
