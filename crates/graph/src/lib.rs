//! # Memento Graph
//!
//! Entity/relation storage used by the session tools.
//!
//! ## Features
//!
//! - **Entities** carrying an ordered list of plain-text observations
//! - **Typed relations** with strength, confidence and free-form metadata
//! - **Store-assigned creation timestamps**, strictly increasing per store
//! - **Optional JSON snapshot** so a graph survives server restarts
//!
//! ## Architecture
//!
//! ```text
//! GraphStore (async trait)
//!     │
//!     └──> MemoryGraphStore
//!            ├─ EntityGraph (petgraph)
//!            │    ├─ Nodes: Entity (name, type, observations, created_at)
//!            │    └─ Edges: Relation (worked_on, continued_from, ...)
//!            │
//!            └─ Snapshot (optional)
//!                 └─ JSON file, rewritten after each write
//! ```

mod error;
mod graph;
mod persist;
mod store;
mod types;

pub use error::{GraphError, Result};
pub use store::{GraphStore, MemoryGraphStore};
pub use types::{Entity, EntityGraph, KnowledgeGraph, NewEntity, Relation, SearchOptions};
