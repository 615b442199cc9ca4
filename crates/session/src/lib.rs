//! # Memento Session
//!
//! Cross-session continuity on top of a plain entity/observation store.
//!
//! The store only understands entities holding an ordered list of text lines, so a
//! structured [`SessionRecord`] is encoded into such a list on write and decoded back
//! on read.
//!
//! ## Architecture
//!
//! ```text
//! write:  SessionRecord ──> encoder (flat | hierarchical) ──> observations
//!                      └──> continuity_edges ──> worked_on / continued_from relations
//!
//! read:   entities ──> select_latest ──> decode (generation inferred) ──> render
//! ```
//!
//! Two line generations coexist in one store without a version tag:
//!
//! - **Flat**: `WORK_COMPLETED:` style markers followed by `- item` lines
//! - **Hierarchical**: `N. NAME:` sections, `- Label:` subsections, `  * item` lines
//!
//! Decoding never fails; unknown lines are dropped.

mod codec;
mod error;
mod journal;
mod link;
mod naming;
mod record;
mod render;
mod select;

pub use codec::{
    decode, decode_with_generation, detect_generation, finalize_lines, Decoded, DecoderState,
    EncodeContext, FlatCodec, Generation, HierarchicalCodec, Section, SessionCodec, Slot,
};
pub use error::{Result, SessionError};
pub use journal::{LastSession, RecordedSession, SessionJournal};
pub use link::{continuity_edges, ContinuityKind, EDGE_CONFIDENCE, EDGE_STRENGTH};
pub use naming::{format_timestamp, session_name, timestamp_from_millis};
pub use record::{
    ContextPreservation, CoreMetadata, FuturePlanning, KnowledgeTracking, LearningAndDocs,
    ProgressTracking, QualityMetrics, RelationshipTracking, SessionRecord, TechnicalContent,
};
pub use render::{render, render_continuation};
pub use select::{select_latest, select_latest_of_type};

/// Entity type tag marking a session record
pub const SESSION_ENTITY_TYPE: &str = "chat_session_summary";
