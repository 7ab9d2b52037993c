//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, route tree compile)
//!     → ClientConfig (validated, immutable)
//!     → consumed once at startup by the binaries
//! ```
//!
//! # Design Decisions
//! - Every field has a default; an empty file yields the built-in route tree
//! - A `[[routes]]` table replaces the built-in tree as a whole
//! - Validation reports every problem at once, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ApiConfig, ClientConfig, LogFormat, NavigationConfig, ObservabilityConfig};
