use crate::types::{Entity, EntityGraph, KnowledgeGraph, Relation, SearchOptions};
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

impl EntityGraph {
    /// Whether an identical (from, to, type) edge already exists
    pub fn has_relation(&self, relation: &Relation) -> bool {
        let Some(from) = self.find_node(&relation.from) else {
            return false;
        };
        self.graph
            .edges(from)
            .any(|e| e.weight().same_edge(relation))
    }

    /// Snapshot of the whole graph
    pub fn to_knowledge_graph(&self) -> KnowledgeGraph {
        KnowledgeGraph {
            entities: self.entities().cloned().collect(),
            relations: self.relations().cloned().collect(),
        }
    }

    /// Case-insensitive substring search over name, type and observations
    pub fn search(&self, query: &str, options: &SearchOptions) -> KnowledgeGraph {
        let needle = query.trim().to_lowercase();
        let limit = options.limit.unwrap_or(usize::MAX);

        let entities: Vec<Entity> = self
            .entities()
            .filter(|entity| {
                options.entity_types.is_empty()
                    || options.entity_types.iter().any(|t| *t == entity.entity_type)
            })
            .filter(|entity| needle.is_empty() || entity_matches(entity, &needle))
            .take(limit)
            .cloned()
            .collect();

        let names: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        let relations = self
            .relations()
            .filter(|r| names.contains(r.from.as_str()) && names.contains(r.to.as_str()))
            .cloned()
            .collect();

        KnowledgeGraph {
            entities,
            relations,
        }
    }
}

fn entity_matches(entity: &Entity, needle: &str) -> bool {
    entity.name.to_lowercase().contains(needle)
        || entity.entity_type.to_lowercase().contains(needle)
        || entity
            .observations
            .iter()
            .any(|obs| obs.to_lowercase().contains(needle))
}
