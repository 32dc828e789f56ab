//! Host adapter orchestrator.
//!
//! The navigation core touches the host UI only through the contracts in
//! this module: geometry lookup, focus assignment, key classification, and
//! the declarative `nav-*` adjacency attribute. Everything else about the
//! host (rendering, element lifecycle, styling) stays outside the crate.

mod core;
mod hints;

pub use core::{FocusTarget, Geometry, NavKey, classify};
pub use hints::{NavHints, Override, parse_nav_hints};
