use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entity as submitted by a writer, before the store stamps it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntity {
    /// Primary identity (e.g., "Chat Session 2025-01-01 10:00:00")
    pub name: String,

    /// Type tag (e.g., "chat_session_summary")
    pub entity_type: String,

    /// Ordered plain-text observations
    pub observations: Vec<String>,
}

impl NewEntity {
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations,
        }
    }
}

/// Entity owned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    pub observations: Vec<String>,

    /// Creation time, unix milliseconds (store-assigned)
    pub created_at: i64,

    /// Last write time, unix milliseconds (store-assigned)
    pub updated_at: i64,
}

impl Entity {
    pub(crate) fn stamped(entity: NewEntity, at: i64) -> Self {
        Self {
            name: entity.name,
            entity_type: entity.entity_type,
            observations: entity.observations,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Directed, typed edge between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub relation_type: String,

    /// Relationship strength in [0, 1]
    pub strength: f64,

    /// Writer's confidence in [0, 1]
    pub confidence: f64,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Relation {
    pub(crate) fn same_edge(&self, other: &Relation) -> bool {
        self.from == other.from && self.to == other.to && self.relation_type == other.relation_type
    }
}

/// Read result: a set of entities and the relations among them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

/// Filters for [`crate::GraphStore::search`]
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict to these entity types (empty = all types)
    pub entity_types: Vec<String>,

    /// Maximum number of entities to return
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub fn for_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity_types: types.into_iter().map(Into::into).collect(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Entity graph with a name index
#[derive(Clone)]
pub struct EntityGraph {
    /// Directed graph (entity -> entity with relations)
    pub graph: DiGraph<Entity, Relation>,

    /// Entity name -> NodeIndex mapping for fast lookup
    pub name_index: HashMap<String, NodeIndex>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
        }
    }

    /// Add entity node; the caller guarantees the name is unused
    pub fn add_entity(&mut self, entity: Entity) -> NodeIndex {
        let name = entity.name.clone();
        let idx = self.graph.add_node(entity);
        self.name_index.insert(name, idx);
        idx
    }

    /// Add relation edge between two existing nodes
    pub fn add_relation(&mut self, from: NodeIndex, to: NodeIndex, relation: Relation) {
        self.graph.add_edge(from, to, relation);
    }

    /// Find node by entity name
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
    }

    /// Relations in insertion order
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.graph
            .edge_indices()
            .filter_map(move |idx| self.graph.edge_weight(idx))
    }

    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}
