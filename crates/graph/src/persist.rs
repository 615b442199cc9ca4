use crate::error::{GraphError, Result};
use crate::types::{Entity, EntityGraph, Relation};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedGraph {
    v: u32,
    entities: Vec<Entity>,
    relations: Vec<Relation>,
}

/// Load a snapshot. A missing file is an empty graph.
pub(crate) fn load_snapshot(path: &Path) -> Result<EntityGraph> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(EntityGraph::new()),
        Err(source) => {
            return Err(GraphError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let persisted: PersistedGraph = serde_json::from_slice(&bytes)?;
    if persisted.v != SNAPSHOT_VERSION {
        return Err(GraphError::SnapshotVersion {
            path: path.to_path_buf(),
            version: persisted.v,
        });
    }

    let mut graph = EntityGraph::new();
    for entity in persisted.entities {
        if graph.contains(&entity.name) {
            log::warn!("Snapshot {} repeats entity '{}'; keeping the first", path.display(), entity.name);
            continue;
        }
        graph.add_entity(entity);
    }

    let mut dropped = 0usize;
    for relation in persisted.relations {
        match (graph.find_node(&relation.from), graph.find_node(&relation.to)) {
            (Some(from), Some(to)) => graph.add_relation(from, to, relation),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!(
            "Snapshot {} had {dropped} relation(s) with missing endpoints",
            path.display()
        );
    }

    log::debug!(
        "Loaded graph snapshot {} ({} entities, {} relations)",
        path.display(),
        graph.entity_count(),
        graph.relation_count()
    );
    Ok(graph)
}

/// Write a snapshot through a temp file + rename.
pub(crate) fn write_snapshot(path: &Path, graph: &EntityGraph) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| GraphError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let persisted = PersistedGraph {
        v: SNAPSHOT_VERSION,
        entities: graph.entities().cloned().collect(),
        relations: graph.relations().cloned().collect(),
    };
    let data = serde_json::to_vec_pretty(&persisted)?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &data).map_err(|source| GraphError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
