use memento_graph::Relation;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

pub const EDGE_STRENGTH: f64 = 1.0;
pub const EDGE_CONFIDENCE: f64 = 1.0;

/// Relation kinds written alongside a session record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuityKind {
    /// session -> entity touched during the session
    WorkedOn,
    /// session -> the session it resumes
    ContinuedFrom,
}

impl ContinuityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContinuityKind::WorkedOn => "worked_on",
            ContinuityKind::ContinuedFrom => "continued_from",
        }
    }

    pub fn from_relation_type(relation_type: &str) -> Option<Self> {
        match relation_type {
            "worked_on" => Some(ContinuityKind::WorkedOn),
            "continued_from" => Some(ContinuityKind::ContinuedFrom),
            _ => None,
        }
    }

    fn edge(self, from: &str, to: &str, metadata: Map<String, Value>) -> Relation {
        Relation {
            from: from.to_string(),
            to: to.to_string(),
            relation_type: self.as_str().to_string(),
            strength: EDGE_STRENGTH,
            confidence: EDGE_CONFIDENCE,
            metadata,
        }
    }
}

impl std::fmt::Display for ContinuityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edges accompanying a new session entity.
///
/// One `worked_on` edge per distinct, non-blank entity name (first occurrence order), then
/// at most one `continued_from` edge. Names are linked exactly as the record stores them.
/// No input yields no edges.
pub fn continuity_edges<S: AsRef<str>>(
    session_name: &str,
    entities_worked: &[S],
    continues_from: Option<&str>,
    at: &str,
) -> Vec<Relation> {
    let mut seen = HashSet::new();
    let mut edges: Vec<Relation> = entities_worked
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.trim().is_empty() && seen.insert(*name))
        .map(|name| {
            ContinuityKind::WorkedOn.edge(
                session_name,
                name,
                metadata(json!({ "sessionDate": at, "context": "session_work" })),
            )
        })
        .collect();

    if let Some(previous) = continues_from.filter(|p| !p.trim().is_empty()) {
        edges.push(ContinuityKind::ContinuedFrom.edge(
            session_name,
            previous,
            metadata(json!({ "continuationDate": at })),
        ));
    }

    edges
}

fn metadata(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const AT: &str = "2025-01-01T10:00:00.000Z";

    fn kinds(edges: &[Relation]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.relation_type.as_str(), e.to.as_str()))
            .collect()
    }

    #[test]
    fn worked_on_edges_only() {
        let edges = continuity_edges("S", &["A", "B"], None, AT);
        assert_eq!(kinds(&edges), vec![("worked_on", "A"), ("worked_on", "B")]);
        for edge in &edges {
            assert_eq!(edge.from, "S");
            assert_eq!(edge.strength, 1.0);
            assert_eq!(edge.confidence, 1.0);
            assert_eq!(edge.metadata.get("sessionDate"), Some(&json!(AT)));
            assert_eq!(edge.metadata.get("context"), Some(&json!("session_work")));
        }
    }

    #[test]
    fn continued_from_edge_only() {
        let edges = continuity_edges::<&str>("S", &[], Some("Session X"), AT);
        assert_eq!(kinds(&edges), vec![("continued_from", "Session X")]);
        assert_eq!(edges[0].metadata.get("continuationDate"), Some(&json!(AT)));
    }

    #[test]
    fn nothing_to_link_is_not_an_error() {
        assert!(continuity_edges::<&str>("S", &[], None, AT).is_empty());
        assert!(continuity_edges("S", &["  ", ""], Some(" "), AT).is_empty());
    }

    #[test]
    fn repeated_names_link_once() {
        let edges = continuity_edges("S", &["A", "B", "A"], Some("P"), AT);
        assert_eq!(
            kinds(&edges),
            vec![("worked_on", "A"), ("worked_on", "B"), ("continued_from", "P")]
        );
    }

    #[test]
    fn names_are_linked_as_stored() {
        let edges = continuity_edges("S", &[" B ", "B"], Some(" P"), AT);
        assert_eq!(
            kinds(&edges),
            vec![("worked_on", " B "), ("worked_on", "B"), ("continued_from", " P")]
        );
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [ContinuityKind::WorkedOn, ContinuityKind::ContinuedFrom] {
            assert_eq!(ContinuityKind::from_relation_type(kind.as_str()), Some(kind));
        }
        assert_eq!(ContinuityKind::from_relation_type("relates_to"), None);
    }
}
