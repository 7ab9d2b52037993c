//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     ClientConfig → Router::compile → Store + HttpApi + MiddlewareChain
//!         → Navigator + Operations → Portal
//! ```

pub mod startup;

pub use startup::{start, Portal, StartupError};
