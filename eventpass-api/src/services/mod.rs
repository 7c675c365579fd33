//! Service Layer
//!
//! Account and event operations. Services own the business rules and talk to
//! storage only through the capability traits, so the transports stay thin
//! and the same logic runs over PostgreSQL or the in-memory store.

mod account_service;
mod event_service;

pub use account_service::AccountService;
pub use event_service::EventService;
