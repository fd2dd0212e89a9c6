//! Scoped logging on top of `tracing`.
//!
//! Every event carries a `scope` field (`scene`, `input`, `selection`,
//! `teleport`) and is dropped unless the level configured for that scope
//! allows it. Levels come from the environment via `init_logging`.

pub mod config;
pub mod macros;

pub use config::{get_log_config, init_logging, LogConfig};
// The scope macros expand to `$crate::logging::tracing::event!`
pub use tracing;
pub use tracing::{info, Level};
