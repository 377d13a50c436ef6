//! In-memory `SessionStorePort` adapter with background idle eviction.

pub mod store;

pub use store::InMemorySessionStore;
