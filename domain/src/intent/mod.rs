//! Intent: the classifier's typed categorization of a user message.

pub mod entities;

pub use entities::{Intent, IntentKind};
