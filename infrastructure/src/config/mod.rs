//! Configuration loading for the MCP host.
//!
//! Two distinct concrete loaders (§6), both ambient (not collaborator
//! contracts):
//!
//! 1. [`inventory::ServerInventory`] — plain `serde_json` deserialization of
//!    the on-disk server-inventory descriptor, fail-fast on a bad entry.
//! 2. [`loader::ConfigLoader`] / [`host_config::FileConfig`] — the teacher's
//!    figment-based TOML/env layering, reshaped to host-level settings.

pub mod host_config;
pub mod inventory;
pub mod loader;

pub use host_config::{ConfigValidationError, FileConfig, FileLlmConfig};
pub use inventory::{ServerEntry, ServerInventory};
pub use loader::ConfigLoader;
