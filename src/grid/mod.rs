//! Grid module orchestrator.
//!
//! The static half of the navigation core: `packer` lays cells into a
//! bounded occupancy map, `adjacency` compiles the chase map from it.
//! Implementation details live in the private submodules; downstream code
//! imports from here.

mod adjacency;
mod cell;
mod config;
mod packer;

pub use adjacency::{NeighborSlot, NeighborTable, compile};
pub use cell::{CellId, CellSpec};
pub use config::{ExitRule, PanelConfig, PerpendicularBias};
pub use packer::{OccupancyMap, PackReport, PackedCell, PackedPanel, Slot, pack};
