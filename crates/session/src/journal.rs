use crate::codec::{decode_with_generation, EncodeContext, Generation};
use crate::error::{Result, SessionError};
use crate::link::{continuity_edges, ContinuityKind};
use crate::naming::{format_timestamp, session_name, timestamp_from_millis};
use crate::record::SessionRecord;
use crate::render::render_continuation;
use crate::select::select_latest;
use crate::SESSION_ENTITY_TYPE;
use chrono::{DateTime, Utc};
use memento_graph::{Entity, GraphStore, NewEntity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of [`SessionJournal::record`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSession {
    pub session_name: String,
    pub session_date: String,
    pub generation: Generation,
    pub entity: Entity,
    pub relations_created: usize,
    /// Item count per sequence field, keyed by wire name
    pub item_counts: BTreeMap<String, usize>,
}

/// Most recent session, decoded and rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSession {
    pub session_name: String,
    pub entity_type: String,
    pub created_at: i64,
    pub session_date: String,
    pub generation: Generation,
    pub record: SessionRecord,
    pub formatted_summary: String,
    pub worked_on: Vec<String>,
    pub continued_from: Option<String>,
}

/// Records sessions into a graph store and reads the latest one back
pub struct SessionJournal<S> {
    store: S,
    environment: Option<String>,
}

impl<S: GraphStore> SessionJournal<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            environment: None,
        }
    }

    /// Environment description for records that do not carry their own
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a session as of now
    pub async fn record(
        &self,
        record: SessionRecord,
        continues_from: Option<&str>,
        generation: Generation,
    ) -> Result<RecordedSession> {
        self.record_at(record, continues_from, generation, Utc::now())
            .await
    }

    /// Encode, write the entity, then write its continuity edges.
    ///
    /// `continues_from` falls back to `relationshipTracking.previousSession`.
    pub async fn record_at(
        &self,
        record: SessionRecord,
        continues_from: Option<&str>,
        generation: Generation,
        now: DateTime<Utc>,
    ) -> Result<RecordedSession> {
        if record.overview.trim().is_empty() {
            return Err(SessionError::EmptyOverview);
        }

        let name = session_name(now);
        let session_date = format_timestamp(now);
        let mut ctx = EncodeContext::new(session_date.clone());
        ctx.environment = self.environment.clone();

        let lines = generation.encode(&record, &ctx);
        let entity = self
            .store
            .create_entities(vec![NewEntity::new(&name, SESSION_ENTITY_TYPE, lines)])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NotCreated(name.clone()))?;

        let continues_from =
            continues_from.or(record.relationship_tracking.previous_session.as_deref());
        let edges = continuity_edges(
            &name,
            &record.relationship_tracking.entities_modified,
            continues_from,
            &session_date,
        );
        let relations_created = if edges.is_empty() {
            0
        } else {
            let requested = edges.len();
            let created = self.store.create_relations(edges).await?.len();
            if created < requested {
                log::warn!(
                    "Session '{name}': {} of {requested} continuity edge(s) skipped",
                    requested - created
                );
            }
            created
        };

        log::info!(
            "Recorded session '{name}' ({generation}, {} items, {relations_created} relations)",
            record.total_items()
        );

        Ok(RecordedSession {
            session_name: name,
            session_date,
            generation,
            entity,
            relations_created,
            item_counts: record
                .item_counts()
                .into_iter()
                .map(|(field, count)| (field.to_string(), count))
                .collect(),
        })
    }

    /// Latest session record in the store, or `None` when there is none
    pub async fn last_session(&self) -> Result<Option<LastSession>> {
        let graph = self.store.read_graph().await?;
        let Some(entity) = select_latest(&graph.entities) else {
            log::debug!("No session records among {} entities", graph.entities.len());
            return Ok(None);
        };

        let decoded = decode_with_generation(&entity.observations);
        let session_date = format_timestamp(timestamp_from_millis(entity.created_at));
        let formatted_summary = render_continuation(&entity.name, &session_date, &decoded.record);

        let mut worked_on = Vec::new();
        let mut continued_from = None;
        for relation in graph.relations.iter().filter(|r| r.from == entity.name) {
            match ContinuityKind::from_relation_type(&relation.relation_type) {
                Some(ContinuityKind::WorkedOn) => worked_on.push(relation.to.clone()),
                Some(ContinuityKind::ContinuedFrom) if continued_from.is_none() => {
                    continued_from = Some(relation.to.clone());
                }
                _ => {}
            }
        }

        Ok(Some(LastSession {
            session_name: entity.name.clone(),
            entity_type: entity.entity_type.clone(),
            created_at: entity.created_at,
            session_date,
            generation: decoded.generation,
            record: decoded.record,
            formatted_summary,
            worked_on,
            continued_from,
        }))
    }
}
