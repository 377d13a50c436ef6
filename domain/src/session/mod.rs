//! Session domain.
//!
//! - [`entities::Session`] — a conversation's bounded, retained message log
//! - [`entities::Message`] — a single message within a session
//! - [`stream::StreamEvent`] — a chunk of an LLM's streaming completion

pub mod entities;
pub mod stream;
