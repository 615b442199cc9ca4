use crate::error::{GraphError, Result};
use crate::persist::{load_snapshot, write_snapshot};
use crate::types::{Entity, EntityGraph, KnowledgeGraph, NewEntity, Relation, SearchOptions};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Read/write boundary of the graph store
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create entities; the store assigns `created_at` / `updated_at`
    async fn create_entities(&self, entities: Vec<NewEntity>) -> Result<Vec<Entity>>;

    /// Create relations between existing entities; returns those actually created
    async fn create_relations(&self, relations: Vec<Relation>) -> Result<Vec<Relation>>;

    /// Read every entity and relation
    async fn read_graph(&self) -> Result<KnowledgeGraph>;

    /// Substring search narrowed by [`SearchOptions`]
    async fn search(&self, query: &str, options: SearchOptions) -> Result<KnowledgeGraph>;
}

struct StoreState {
    graph: EntityGraph,
    last_created_at: i64,
}

/// In-process store with optional JSON snapshot
pub struct MemoryGraphStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryGraphStore {
    /// Empty store without persistence
    pub fn new() -> Self {
        Self::from_graph(EntityGraph::new(), None)
    }

    /// Store backed by a snapshot file (created on first write)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let graph = load_snapshot(&path)?;
        log::info!(
            "Opened graph snapshot {} ({} entities)",
            path.display(),
            graph.entity_count()
        );
        Ok(Self::from_graph(graph, Some(path)))
    }

    fn from_graph(graph: EntityGraph, snapshot_path: Option<PathBuf>) -> Self {
        let last_created_at = graph.entities().map(|e| e.created_at).max().unwrap_or(0);
        Self {
            state: RwLock::new(StoreState {
                graph,
                last_created_at,
            }),
            snapshot_path,
        }
    }

    fn persist(&self, graph: &EntityGraph) -> Result<()> {
        match self.snapshot_path.as_deref() {
            Some(path) => write_snapshot(path, graph),
            None => Ok(()),
        }
    }
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn create_entities(&self, entities: Vec<NewEntity>) -> Result<Vec<Entity>> {
        let mut state = self.state.write().await;

        let mut batch_names = HashSet::new();
        for entity in &entities {
            if state.graph.contains(&entity.name) || !batch_names.insert(entity.name.as_str()) {
                return Err(GraphError::DuplicateEntity(entity.name.clone()));
            }
        }

        // Changes land on a copy; the shared graph moves only after the snapshot is written.
        let mut next = state.graph.clone();
        let mut last_created_at = state.last_created_at;
        let mut created = Vec::with_capacity(entities.len());
        for entity in entities {
            // Strictly increasing even when the clock has not advanced.
            let at = unix_ms_now().max(last_created_at + 1);
            last_created_at = at;
            let entity = Entity::stamped(entity, at);
            next.add_entity(entity.clone());
            created.push(entity);
        }

        self.persist(&next)?;
        state.graph = next;
        state.last_created_at = last_created_at;
        log::debug!("Created {} entities", created.len());
        Ok(created)
    }

    async fn create_relations(&self, relations: Vec<Relation>) -> Result<Vec<Relation>> {
        let mut state = self.state.write().await;

        let mut next = state.graph.clone();
        let mut created = Vec::new();
        for relation in relations {
            let endpoints = (next.find_node(&relation.from), next.find_node(&relation.to));
            let (Some(from), Some(to)) = endpoints else {
                log::warn!(
                    "Skipping relation {} -[{}]-> {}: endpoint not found",
                    relation.from,
                    relation.relation_type,
                    relation.to
                );
                continue;
            };
            if next.has_relation(&relation) {
                continue;
            }
            next.add_relation(from, to, relation.clone());
            created.push(relation);
        }

        if !created.is_empty() {
            self.persist(&next)?;
            state.graph = next;
        }
        log::debug!("Created {} relations", created.len());
        Ok(created)
    }

    async fn read_graph(&self) -> Result<KnowledgeGraph> {
        let state = self.state.read().await;
        Ok(state.graph.to_knowledge_graph())
    }

    async fn search(&self, query: &str, options: SearchOptions) -> Result<KnowledgeGraph> {
        let state = self.state.read().await;
        Ok(state.graph.search(query, &options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn relation(from: &str, to: &str, relation_type: &str) -> Relation {
        Relation {
            from: from.to_string(),
            to: to.to_string(),
            relation_type: relation_type.to_string(),
            strength: 1.0,
            confidence: 1.0,
            metadata: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn created_at_is_strictly_increasing() {
        let store = MemoryGraphStore::new();
        let mut last = 0;
        for i in 0..20 {
            let created = store
                .create_entities(vec![NewEntity::new(format!("E{i}"), "t", vec![])])
                .await
                .unwrap();
            assert!(created[0].created_at > last);
            last = created[0].created_at;
        }
    }

    #[tokio::test]
    async fn duplicate_names_reject_whole_batch() {
        let store = MemoryGraphStore::new();
        store
            .create_entities(vec![NewEntity::new("A", "t", vec![])])
            .await
            .unwrap();

        let err = store
            .create_entities(vec![
                NewEntity::new("B", "t", vec![]),
                NewEntity::new("A", "t", vec![]),
            ])
            .await
            .err()
            .expect("duplicate must fail");
        assert!(matches!(err, GraphError::DuplicateEntity(name) if name == "A"));

        let graph = store.read_graph().await.unwrap();
        assert_eq!(graph.entities.len(), 1);
    }

    #[tokio::test]
    async fn relations_skip_missing_endpoints_and_duplicates() {
        let store = MemoryGraphStore::new();
        store
            .create_entities(vec![
                NewEntity::new("S", "chat_session_summary", vec![]),
                NewEntity::new("X", "component", vec![]),
            ])
            .await
            .unwrap();

        let created = store
            .create_relations(vec![
                relation("S", "X", "worked_on"),
                relation("S", "Ghost", "worked_on"),
                relation("S", "X", "worked_on"),
            ])
            .await
            .unwrap();
        assert_eq!(created, vec![relation("S", "X", "worked_on")]);

        let again = store
            .create_relations(vec![relation("S", "X", "worked_on")])
            .await
            .unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn search_narrows_by_type_and_limit() {
        let store = MemoryGraphStore::new();
        store
            .create_entities(vec![
                NewEntity::new("Chat Session 1", "chat_session_summary", vec![]),
                NewEntity::new("Chat Session 2", "chat_session_summary", vec![]),
                NewEntity::new("Chat widget", "component", vec![]),
            ])
            .await
            .unwrap();

        let sessions = store
            .search("chat", SearchOptions::for_types(["chat_session_summary"]))
            .await
            .unwrap();
        assert_eq!(sessions.entities.len(), 2);

        let first = store
            .search("chat", SearchOptions::default().with_limit(1))
            .await
            .unwrap();
        assert_eq!(first.entities.len(), 1);
        assert_eq!(first.entities[0].name, "Chat Session 1");
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let first_created = {
            let store = MemoryGraphStore::open(&path).unwrap();
            let created = store
                .create_entities(vec![
                    NewEntity::new("S", "chat_session_summary", vec!["SESSION_OVERVIEW: hi".into()]),
                    NewEntity::new("X", "component", vec![]),
                ])
                .await
                .unwrap();
            store
                .create_relations(vec![relation("S", "X", "worked_on")])
                .await
                .unwrap();
            created[1].created_at
        };

        let reopened = MemoryGraphStore::open(&path).unwrap();
        let graph = reopened.read_graph().await.unwrap();
        assert_eq!(graph.entities.len(), 2);
        assert_eq!(graph.entities[0].observations, vec!["SESSION_OVERVIEW: hi".to_string()]);
        assert_eq!(graph.relations.len(), 1);

        let next = reopened
            .create_entities(vec![NewEntity::new("Y", "component", vec![])])
            .await
            .unwrap();
        assert!(next[0].created_at > first_created);
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_graph_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let store = MemoryGraphStore::open(&path).unwrap();
        store
            .create_entities(vec![
                NewEntity::new("S", "chat_session_summary", vec![]),
                NewEntity::new("X", "component", vec![]),
            ])
            .await
            .unwrap();

        // A directory in place of the temp file makes every snapshot write fail.
        let tmp = path.with_extension("tmp");
        std::fs::create_dir(&tmp).unwrap();

        let err = store
            .create_entities(vec![NewEntity::new("T", "chat_session_summary", vec![])])
            .await
            .err()
            .expect("snapshot write must fail");
        assert!(matches!(err, GraphError::Io { .. }));
        let err = store
            .create_relations(vec![relation("S", "X", "worked_on")])
            .await
            .err()
            .expect("snapshot write must fail");
        assert!(matches!(err, GraphError::Io { .. }));

        let graph = store.read_graph().await.unwrap();
        let names: Vec<&str> = graph.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["S", "X"]);
        assert!(graph.relations.is_empty());

        std::fs::remove_dir(&tmp).unwrap();
        let retried = store
            .create_entities(vec![NewEntity::new("T", "chat_session_summary", vec![])])
            .await
            .unwrap();
        assert_eq!(retried[0].name, "T");
        store
            .create_relations(vec![relation("S", "X", "worked_on")])
            .await
            .unwrap();

        let reopened = MemoryGraphStore::open(&path).unwrap().read_graph().await.unwrap();
        assert_eq!(reopened.entities.len(), 3);
        assert_eq!(reopened.relations.len(), 1);
    }
}
