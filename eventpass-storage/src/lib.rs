//! EventPass Storage - Record Store Capabilities
//!
//! Defines the persistence boundary as two narrow capability sets, one per
//! record kind, plus a transactional handle that implements both. Services
//! take only the capability they use; the PostgreSQL implementation lives in
//! eventpass-api and the in-memory one in [`mock`].
//!
//! Stores never retry: every failure is returned with its [`StoreError`]
//! category so callers can tell "not found" from "unavailable".

pub mod mock;

pub use mock::{MockStorage, MockTransaction};

use async_trait::async_trait;
use eventpass_core::{Event, NewEvent, NewUser, StoreResult, User};

// Re-exported so store implementors need not depend on eventpass-core directly.
pub use eventpass_core::{EntityType, StoreError, UniqueField};

// ============================================================================
// CAPABILITY SETS
// ============================================================================

/// User record capability.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. The store assigns `created_at`.
    ///
    /// Fails with [`StoreError::Conflict`] when the id, username or email is
    /// already taken.
    async fn create_user(&self, user: &NewUser) -> StoreResult<()>;

    /// Get a user by ID, or [`StoreError::NotFound`].
    async fn get_user(&self, user_id: &str) -> StoreResult<User>;

    /// Get a user by exact username, or [`StoreError::NotFound`].
    async fn get_user_by_username(&self, username: &str) -> StoreResult<User>;
}

/// Event record capability.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event. Slot counts are not validated here.
    async fn create_event(&self, event: &NewEvent) -> StoreResult<()>;

    /// Get an event by ID, or [`StoreError::NotFound`].
    async fn get_event(&self, event_id: &str) -> StoreResult<Event>;
}

// ============================================================================
// TRANSACTIONAL HANDLE
// ============================================================================

/// A unit of work spanning both record kinds.
///
/// Writes made through the handle become visible to other callers only after
/// [`Transaction::commit`]. Dropping the handle without committing discards
/// them.
#[async_trait]
pub trait Transaction: UserStore + EventStore {
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// The full store: both capabilities directly (each call its own commit)
/// and a way to open a [`Transaction`] over them.
#[async_trait]
pub trait RecordStore: UserStore + EventStore {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>>;
}
