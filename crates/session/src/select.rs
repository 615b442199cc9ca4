use crate::SESSION_ENTITY_TYPE;
use memento_graph::Entity;

/// Most recently created session record, if any.
///
/// Equal `created_at` values keep the first candidate in input order.
pub fn select_latest<'a, I>(entities: I) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    select_latest_of_type(entities, SESSION_ENTITY_TYPE)
}

pub fn select_latest_of_type<'a, I>(entities: I, entity_type: &str) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut latest: Option<&'a Entity> = None;
    for entity in entities
        .into_iter()
        .filter(|entity| entity.entity_type == entity_type)
    {
        match latest {
            Some(current) if entity.created_at <= current.created_at => {}
            _ => latest = Some(entity),
        }
    }
    latest
}
