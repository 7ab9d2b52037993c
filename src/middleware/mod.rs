//! Data-loading middleware subsystem.
//!
//! # Data Flow
//! ```text
//! NavigationRequest { from, to, pending_state, sequence }
//!     → context.rs (working copy of pending_state + action buffer)
//!     → chain.rs (steps in fixed order)
//!         → step.applies(ctx)?  (cache missing, invalidated, or key changed)
//!         → step.load(ctx)      (fetch via Api, dispatch into the buffer)
//!     → Ok(buffered actions) or Err(ApiError) on first failed fetch
//! ```
//!
//! # Design Decisions
//! - Steps never touch the store; the navigator commits the buffer
//! - A loaded cache is refetched only when its category is invalidated
//!   or, for keyed caches, when the key parameter changes
//! - First failure aborts the chain

pub mod chain;
pub mod context;
pub mod steps;

pub use chain::{MiddlewareChain, MiddlewareStep};
pub use context::NavigationContext;
