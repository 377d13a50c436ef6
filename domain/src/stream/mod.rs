//! Stream domain: typed progress events fanned out to a session's
//! subscriber, and the subscriber connection itself.

pub mod connection;
pub mod message;

pub use connection::StreamConnection;
pub use message::StreamMessage;
