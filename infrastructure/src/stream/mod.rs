//! Stream Hub adapter: fans turn progress out to at most one subscriber
//! per session over bounded, best-effort mpsc queues.

pub mod hub;

pub use hub::StreamHub;
