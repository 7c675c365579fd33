//! In-memory record store for tests and local development.
//!
//! Mirrors the PostgreSQL store's contract: unique id/username/email for
//! users, unique id for events, `NotFound` for missing rows, and
//! store-assigned `created_at`. Outages can be simulated with
//! [`MockStorage::set_unavailable`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use eventpass_core::{
    EntityId, EntityType, Event, NewEvent, NewUser, StoreError, StoreResult, UniqueField, User,
};
use tokio::sync::{Mutex, RwLock};

use crate::{EventStore, RecordStore, Transaction, UserStore};

#[derive(Debug, Default)]
struct MockState {
    users: RwLock<HashMap<EntityId, User>>,
    events: RwLock<HashMap<EntityId, Event>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MockState {
    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "mock store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    state: Arc<MockState>,
}

impl MockStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.state.unavailable.load(Ordering::SeqCst)
    }

    /// Number of rows committed so far.
    pub fn write_count(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    /// Get count of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.users.read().await.len()
    }

    /// Get count of stored events.
    pub async fn event_count(&self) -> usize {
        self.state.events.read().await.len()
    }

    /// Raw stored user, verifier included. For assertions on what was persisted.
    pub async fn stored_user(&self, user_id: &str) -> Option<User> {
        self.state.users.read().await.get(user_id).cloned()
    }

    /// Clear all stored data.
    pub async fn clear(&self) {
        self.state.users.write().await.clear();
        self.state.events.write().await.clear();
        self.state.writes.store(0, Ordering::SeqCst);
    }
}

fn user_conflict<'a>(
    mut existing: impl Iterator<Item = &'a User>,
    user_id: &str,
    username: &str,
    email: &str,
) -> Option<UniqueField> {
    existing.find_map(|u| {
        if u.user_id == user_id {
            Some(UniqueField::Id)
        } else if u.username == username {
            Some(UniqueField::Username)
        } else if u.email == email {
            Some(UniqueField::Email)
        } else {
            None
        }
    })
}

fn materialize_user(new_user: &NewUser) -> User {
    User {
        user_id: new_user.user_id.clone(),
        first_name: new_user.first_name.clone(),
        last_name: new_user.last_name.clone(),
        username: new_user.username.clone(),
        email: new_user.email.clone(),
        phone: new_user.phone.clone(),
        password_verifier: new_user.password_verifier.clone(),
        created_at: Utc::now(),
    }
}

fn materialize_event(new_event: &NewEvent) -> Event {
    Event {
        event_id: new_event.event_id.clone(),
        title: new_event.title.clone(),
        description: new_event.description.clone(),
        location: new_event.location.clone(),
        date: new_event.date,
        start_time: new_event.start_time,
        end_time: new_event.end_time,
        created_by: new_event.created_by.clone(),
        total_slots: new_event.total_slots,
        created_at: Utc::now(),
    }
}

fn user_not_found(key: &str) -> StoreError {
    StoreError::NotFound {
        entity: EntityType::User,
        key: key.to_string(),
    }
}

fn event_not_found(key: &str) -> StoreError {
    StoreError::NotFound {
        entity: EntityType::Event,
        key: key.to_string(),
    }
}

fn event_conflict() -> StoreError {
    StoreError::Conflict {
        entity: EntityType::Event,
        field: UniqueField::Id,
    }
}

#[async_trait]
impl UserStore for MockStorage {
    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        self.state.check_available()?;
        let mut users = self.state.users.write().await;
        if let Some(field) =
            user_conflict(users.values(), &user.user_id, &user.username, &user.email)
        {
            return Err(StoreError::Conflict {
                entity: EntityType::User,
                field,
            });
        }
        users.insert(user.user_id.clone(), materialize_user(user));
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.state.check_available()?;
        let users = self.state.users.read().await;
        users.get(user_id).cloned().ok_or_else(|| user_not_found(user_id))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.state.check_available()?;
        let users = self.state.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| user_not_found(username))
    }
}

#[async_trait]
impl EventStore for MockStorage {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<()> {
        self.state.check_available()?;
        let mut events = self.state.events.write().await;
        if events.contains_key(&event.event_id) {
            return Err(event_conflict());
        }
        events.insert(event.event_id.clone(), materialize_event(event));
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> StoreResult<Event> {
        self.state.check_available()?;
        let events = self.state.events.read().await;
        events.get(event_id).cloned().ok_or_else(|| event_not_found(event_id))
    }
}

#[async_trait]
impl RecordStore for MockStorage {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        self.state.check_available()?;
        Ok(Box::new(MockTransaction {
            state: self.state.clone(),
            staged_users: Mutex::new(Vec::new()),
            staged_events: Mutex::new(Vec::new()),
        }))
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Staged writes over a [`MockStorage`], applied all-or-nothing on commit.
#[derive(Debug)]
pub struct MockTransaction {
    state: Arc<MockState>,
    staged_users: Mutex<Vec<User>>,
    staged_events: Mutex<Vec<Event>>,
}

#[async_trait]
impl UserStore for MockTransaction {
    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        self.state.check_available()?;
        let committed = self.state.users.read().await;
        let mut staged = self.staged_users.lock().await;
        if let Some(field) = user_conflict(
            committed.values().chain(staged.iter()),
            &user.user_id,
            &user.username,
            &user.email,
        ) {
            return Err(StoreError::Conflict {
                entity: EntityType::User,
                field,
            });
        }
        staged.push(materialize_user(user));
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.state.check_available()?;
        if let Some(user) = self
            .staged_users
            .lock()
            .await
            .iter()
            .find(|u| u.user_id == user_id)
        {
            return Ok(user.clone());
        }
        let users = self.state.users.read().await;
        users.get(user_id).cloned().ok_or_else(|| user_not_found(user_id))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.state.check_available()?;
        if let Some(user) = self
            .staged_users
            .lock()
            .await
            .iter()
            .find(|u| u.username == username)
        {
            return Ok(user.clone());
        }
        let users = self.state.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| user_not_found(username))
    }
}

#[async_trait]
impl EventStore for MockTransaction {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<()> {
        self.state.check_available()?;
        let committed = self.state.events.read().await;
        let mut staged = self.staged_events.lock().await;
        if committed.contains_key(&event.event_id)
            || staged.iter().any(|e| e.event_id == event.event_id)
        {
            return Err(event_conflict());
        }
        staged.push(materialize_event(event));
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> StoreResult<Event> {
        self.state.check_available()?;
        if let Some(event) = self
            .staged_events
            .lock()
            .await
            .iter()
            .find(|e| e.event_id == event_id)
        {
            return Ok(event.clone());
        }
        let events = self.state.events.read().await;
        events.get(event_id).cloned().ok_or_else(|| event_not_found(event_id))
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.state.check_available()?;
        let staged_users = self.staged_users.into_inner();
        let staged_events = self.staged_events.into_inner();

        let mut users = self.state.users.write().await;
        let mut events = self.state.events.write().await;

        // Another caller may have committed a colliding row since staging.
        for user in &staged_users {
            if let Some(field) =
                user_conflict(users.values(), &user.user_id, &user.username, &user.email)
            {
                return Err(StoreError::Conflict {
                    entity: EntityType::User,
                    field,
                });
            }
        }
        if staged_events.iter().any(|e| events.contains_key(&e.event_id)) {
            return Err(event_conflict());
        }

        let written = staged_users.len() + staged_events.len();
        for user in staged_users {
            users.insert(user.user_id.clone(), user);
        }
        for event in staged_events {
            events.insert(event.event_id.clone(), event);
        }
        self.state.writes.fetch_add(written, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
