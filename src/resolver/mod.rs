//! Dynamic neighbor resolution orchestrator.
//!
//! The free-form half of the navigation core: a per-key-press nearest
//! neighbor search over live geometry, as opposed to the precompiled chase
//! map in `grid`. Implementation lives in the private `core` module.

mod core;

pub use core::{NavigableElement, Resolution, resolve};
