//! Identity types for EventPass entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque entity identifier.
///
/// Callers may only compare and look up by it; the textual form carries no
/// structure they can rely on.
pub type EntityId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Allocate a new entity identifier.
///
/// Backed by a random (v4) UUID rendered in canonical hyphenated form, so
/// collisions are improbable without any shared state between callers.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_entity_id_is_canonical_uuid() {
        let id = new_entity_id();
        assert_eq!(id.len(), 36);
        let parsed = Uuid::parse_str(&id).expect("canonical uuid");
        assert_eq!(parsed.to_string(), id);
    }

    #[test]
    fn test_new_entity_id_ten_thousand_distinct() {
        let ids: HashSet<EntityId> = (0..10_000).map(|_| new_entity_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_new_entity_id_concurrent_callers() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..1_000).map(|_| new_entity_id()).collect::<Vec<_>>()))
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread panicked") {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 8_000);
    }
}
