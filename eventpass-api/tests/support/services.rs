//! Mock-backed services and routers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use eventpass_api::{create_api_router, AccountService, ApiConfig, EventService};
use eventpass_test_utils::fixtures::test_codec;
use eventpass_test_utils::MockStorage;

/// Services over one shared in-memory store.
pub struct TestServices {
    pub store: MockStorage,
    pub accounts: Arc<AccountService>,
    pub events: Arc<EventService>,
}

pub fn test_services() -> TestServices {
    let store = MockStorage::new();
    let accounts = Arc::new(
        AccountService::new(Arc::new(store.clone()), test_codec())
            .expect("Failed to create account service"),
    );
    let events = Arc::new(EventService::new(Arc::new(store.clone())));
    TestServices {
        store,
        accounts,
        events,
    }
}

/// Full HTTP gateway over the given services.
pub fn test_router(services: &TestServices) -> Router {
    create_api_router(
        services.accounts.clone(),
        services.events.clone(),
        Arc::new(services.store.clone()),
        &ApiConfig::default(),
        true,
    )
}
