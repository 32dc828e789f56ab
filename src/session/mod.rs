//! Navigation session orchestrator.
//!
//! The composition root tying the registry, exits, chase maps, and the
//! dynamic resolver to host key events. Implementation lives in the
//! private `core` module.

mod core;

pub use core::{NavOutcome, NavigationSession, SessionConfig};
