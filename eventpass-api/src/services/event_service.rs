//! Event Service
//!
//! Event creation and lookup over an [`EventStore`].

use std::sync::Arc;

use eventpass_core::{
    check_length, limits, new_entity_id, parse_event_date, parse_event_time, EntityId,
    EventDetails, EventDraft, NewEvent, ServiceError, ServiceResult, StoreError,
    ValidationError,
};
use eventpass_storage::EventStore;

/// Event operations.
pub struct EventService {
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// Validate a draft, persist it and return the new event id.
    ///
    /// A negative slot count, an over-wide text field or an unparseable
    /// date/time is rejected before the store is touched.
    pub async fn create_event(&self, draft: EventDraft) -> ServiceResult<EntityId> {
        if draft.total_slots < 0 {
            return Err(ValidationError::invalid("total_slots", "must be >= 0").into());
        }
        check_length("event_title", &draft.title, limits::EVENT_TITLE)?;
        check_length("event_location", &draft.location, limits::EVENT_LOCATION)?;
        check_length("created_by", &draft.created_by, limits::CREATED_BY)?;

        let date = parse_event_date("event_date", &draft.date)?;
        let start_time = parse_event_time("event_start_time", &draft.start_time)?;
        let end_time = parse_event_time("event_end_time", &draft.end_time)?;

        let new_event = NewEvent {
            event_id: new_entity_id(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            date,
            start_time,
            end_time,
            created_by: draft.created_by,
            total_slots: draft.total_slots,
        };

        self.events.create_event(&new_event).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create event");
            ServiceError::internal("failed to create event")
        })?;

        tracing::info!(
            event_id = %new_event.event_id,
            created_by = %new_event.created_by,
            "Event created"
        );
        Ok(new_event.event_id)
    }

    /// Look up an event with its date and times rendered as text.
    pub async fn get_event_details(&self, event_id: &str) -> ServiceResult<EventDetails> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(ValidationError::missing("event_id").into());
        }

        match self.events.get_event(event_id).await {
            Ok(event) => Ok(event.details()),
            Err(StoreError::NotFound { .. }) => Err(ServiceError::EventNotFound {
                id: event_id.to_string(),
            }),
            Err(e) => {
                tracing::error!(error = %e, event_id = %event_id, "Failed to load event");
                Err(ServiceError::internal("failed to load event"))
            }
        }
    }
}

impl std::fmt::Debug for EventService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventpass_storage::MockStorage;
    use eventpass_test_utils::assertions::*;
    use eventpass_test_utils::fixtures::sample_event_draft;

    fn service() -> (EventService, MockStorage) {
        let store = MockStorage::new();
        (EventService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_create_then_get_details() {
        let (service, _) = service();
        let id = service
            .create_event(sample_event_draft("user-1"))
            .await
            .unwrap();

        let details = service.get_event_details(&id).await.unwrap();
        assert_eq!(details.event_id, id);
        assert_eq!(details.title, "RustConf Meetup");
        assert_eq!(details.date, "2025-09-12");
        assert_eq!(details.start_time, "18:00:00");
        assert_eq!(details.end_time, "21:30:00");
        assert_eq!(details.created_by, "user-1");
        assert_eq!(details.total_slots, 50);
    }

    #[tokio::test]
    async fn test_negative_slots_rejected_without_write() {
        let (service, store) = service();
        let draft = EventDraft {
            total_slots: -1,
            ..sample_event_draft("user-1")
        };

        let result = service.create_event(draft).await;
        assert_eq!(
            result,
            Err(ServiceError::InvalidArgument(ValidationError::invalid(
                "total_slots",
                "must be >= 0"
            )))
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_slots_allowed() {
        let (service, _) = service();
        let draft = EventDraft {
            total_slots: 0,
            ..sample_event_draft("user-1")
        };
        assert_ok(&service.create_event(draft).await);
    }

    #[tokio::test]
    async fn test_short_times_are_normalized() {
        let (service, _) = service();
        let draft = EventDraft {
            start_time: "09:00".to_string(),
            end_time: "10:15".to_string(),
            ..sample_event_draft("user-1")
        };
        let id = service.create_event(draft).await.unwrap();
        let details = service.get_event_details(&id).await.unwrap();
        assert_eq!(details.start_time, "09:00:00");
        assert_eq!(details.end_time, "10:15:00");
    }

    #[tokio::test]
    async fn test_malformed_date_rejected() {
        let (service, store) = service();
        let draft = EventDraft {
            date: "12/09/2025".to_string(),
            ..sample_event_draft("user-1")
        };
        assert_invalid_argument(&service.create_event(draft).await);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_over_wide_fields_rejected_without_write() {
        let (service, store) = service();

        let long_title = EventDraft {
            title: "t".repeat(limits::EVENT_TITLE + 1),
            ..sample_event_draft("user-1")
        };
        assert_eq!(
            service.create_event(long_title).await,
            Err(ServiceError::InvalidArgument(ValidationError::invalid(
                "event_title",
                "must be at most 255 characters"
            )))
        );

        let long_location = EventDraft {
            location: "l".repeat(limits::EVENT_LOCATION + 1),
            ..sample_event_draft("user-1")
        };
        assert_invalid_argument(&service.create_event(long_location).await);

        let long_creator = "c".repeat(limits::CREATED_BY + 1);
        assert_invalid_argument(&service.create_event(sample_event_draft(&long_creator)).await);

        assert_eq!(store.write_count(), 0);

        let at_limit = EventDraft {
            title: "t".repeat(limits::EVENT_TITLE),
            ..sample_event_draft("user-1")
        };
        assert_ok(&service.create_event(at_limit).await);
    }

    #[tokio::test]
    async fn test_event_id_whitespace_is_trimmed() {
        let (service, _) = service();
        let id = service
            .create_event(sample_event_draft("user-1"))
            .await
            .unwrap();

        let exact = service.get_event_details(&id).await.unwrap();
        let padded = service
            .get_event_details(&format!("  {}\t", id))
            .await
            .unwrap();
        assert_eq!(padded, exact);

        assert_eq!(
            service.get_event_details(" \t\n ").await,
            Err(ServiceError::InvalidArgument(ValidationError::missing(
                "event_id"
            )))
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let (service, store) = service();
        store.set_unavailable(true);
        assert_internal(&service.create_event(sample_event_draft("user-1")).await);
    }

    #[tokio::test]
    async fn test_unknown_event_not_found() {
        let (service, _) = service();
        assert_event_not_found(&service.get_event_details("no-such-event").await);
        assert_invalid_argument(&service.get_event_details("").await);
    }
}
