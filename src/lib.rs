//! Directional focus navigation core for remote-control-driven UIs.
//!
//! Two engines answer "which element gets focus next" for a pressed arrow
//! key: a static grid pipeline (`grid`) that packs cells into an occupancy
//! map and compiles a per-cell chase map, and a dynamic resolver
//! (`resolver`) that searches live pixel geometry on every key press. The
//! `session` module composes both behind one registry and drives the
//! host's focus primitive through the contracts in `adapter`.

pub mod adapter;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod ids;
pub mod logging;
pub mod metrics;
pub mod resolver;
pub mod session;

pub use adapter::{FocusTarget, Geometry, NavHints, NavKey, Override, classify, parse_nav_hints};
pub use error::{NavError, Result};
pub use geometry::{BoundingBox, Direction, Directional, Point, ReferenceMode};
pub use grid::{
    CellId, CellSpec, ExitRule, NeighborSlot, NeighborTable, OccupancyMap, PackReport, PackedCell,
    PackedPanel, PanelConfig, PerpendicularBias, Slot, compile, pack,
};
pub use ids::IdAllocator;
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
};
pub use metrics::{MetricSnapshot, NavMetrics};
pub use resolver::{NavigableElement, Resolution, resolve};
pub use session::{NavOutcome, NavigationSession, SessionConfig};
