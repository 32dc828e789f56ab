use serde::{Deserialize, Serialize};

use crate::geometry::Directional;

/// What happens when navigation reaches a panel boundary.
///
/// `Unset` wraps circularly to the opposite edge, `Target` hands focus to an
/// id outside the panel, `Locked` holds focus in place so it cannot escape
/// the panel on hosts with their own spatial navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitRule {
    #[default]
    Unset,
    Target(String),
    Locked,
}

/// Tie-break along the perpendicular axis when entering a row or column.
///
/// Moving vertically out of a wide cell, `First` lands on the leftmost
/// column of its span and `Last` on the rightmost; symmetric for rows when
/// moving horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerpendicularBias {
    #[default]
    First,
    Last,
}

/// Fully-resolved panel configuration, snapshotted before packing.
///
/// The packer and compiler never mutate this; rebuilding a panel with a
/// changed cell set reuses the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Total column count of the grid.
    pub columns: u16,
    /// Pixel width of one column.
    pub column_unit: u32,
    /// Pixel height of one row unit.
    pub row_unit: u32,
    /// Rows available before overflowing cells are dropped.
    pub max_rows: u16,
    /// Boundary behaviour per direction.
    pub exits: Directional<ExitRule>,
    /// Default perpendicular tie-break per direction, overridable per cell.
    pub default_bias: Directional<PerpendicularBias>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            columns: 12,
            column_unit: 80,
            row_unit: 80,
            max_rows: 4,
            exits: Directional::default(),
            default_bias: Directional::default(),
        }
    }
}

impl PanelConfig {
    pub fn new(columns: u16, column_unit: u32, row_unit: u32, max_rows: u16) -> Self {
        Self {
            columns,
            column_unit,
            row_unit,
            max_rows,
            ..Self::default()
        }
    }

    pub fn with_exits(mut self, exits: Directional<ExitRule>) -> Self {
        self.exits = exits;
        self
    }

    pub fn with_default_bias(mut self, bias: Directional<PerpendicularBias>) -> Self {
        self.default_bias = bias;
        self
    }

    /// Pixel width of the whole panel.
    pub fn panel_width(&self) -> u32 {
        u32::from(self.columns) * self.column_unit
    }
}
