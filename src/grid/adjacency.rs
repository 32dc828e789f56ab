use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::adapter::Override;
use crate::error::{NavError, Result};
use crate::geometry::{Direction, Directional};
use crate::grid::cell::CellId;
use crate::grid::config::{ExitRule, PanelConfig, PerpendicularBias};
use crate::grid::packer::{PackedCell, PackedPanel};

/// One entry of the chase map.
///
/// `Hold` covers both "no movement" outcomes: a locked edge and a layout
/// gap with no occupant at the computed destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborSlot {
    Cell(CellId),
    External(String),
    #[default]
    Hold,
}

/// Precomputed directional neighbor table for a packed panel.
///
/// Fully determined by the occupancy map, panel exits, and per-cell
/// overrides; rebuilt whenever the panel is repacked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NeighborTable {
    entries: HashMap<CellId, Directional<NeighborSlot>>,
}

impl NeighborTable {
    pub fn neighbor(&self, cell: &str, direction: Direction) -> Option<&NeighborSlot> {
        self.entries.get(cell).map(|row| row.get(direction))
    }

    pub fn contains(&self, cell: &str) -> bool {
        self.entries.contains_key(cell)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializable dump of the table for diagnostics channels.
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(&self.entries).unwrap_or(Value::Null)
    }
}

/// Compile the chase map for a packed panel.
///
/// Resolution order per cell and direction: alias override, explicit
/// override (including `Blocked`), boundary exit rule, then interior lookup
/// with circular wrap and perpendicular-bias tie-break. An unknown alias is
/// an authoring error; an empty destination slot is `Hold`.
pub fn compile(panel: &PackedPanel, config: &PanelConfig) -> Result<NeighborTable> {
    let mut alias_index: HashMap<&str, &CellId> = HashMap::new();
    for id in &panel.order {
        if let Some(cell) = panel.cells.get(id) {
            if let Some(alias) = cell.alias.as_deref() {
                // First declaration wins; later duplicates are ignored.
                alias_index.entry(alias).or_insert(id);
            }
        }
    }

    let mut entries = HashMap::with_capacity(panel.order.len());
    for id in &panel.order {
        let cell = match panel.cells.get(id) {
            Some(cell) => cell,
            None => continue,
        };
        let mut row = Directional::<NeighborSlot>::default();
        for direction in Direction::ALL {
            row.set(
                direction,
                resolve_direction(cell, panel, config, &alias_index, direction)?,
            );
        }
        entries.insert(id.clone(), row);
    }

    Ok(NeighborTable { entries })
}

fn resolve_direction(
    cell: &PackedCell,
    panel: &PackedPanel,
    config: &PanelConfig,
    alias_index: &HashMap<&str, &CellId>,
    direction: Direction,
) -> Result<NeighborSlot> {
    match cell.overrides.get(direction) {
        Override::Alias(name) => match alias_index.get(name.as_str()) {
            Some(target) => Ok(NeighborSlot::Cell((*target).clone())),
            None => Err(NavError::UnknownAlias {
                cell: cell.id.clone(),
                alias: name.clone(),
            }),
        },
        Override::Element(target) => {
            if panel.cells.contains_key(target) {
                Ok(NeighborSlot::Cell(target.clone()))
            } else {
                // Ids outside the panel are exit targets.
                Ok(NeighborSlot::External(target.clone()))
            }
        }
        Override::Blocked => Ok(NeighborSlot::Hold),
        Override::Unset => Ok(computed_neighbor(cell, panel, config, direction)),
    }
}

fn computed_neighbor(
    cell: &PackedCell,
    panel: &PackedPanel,
    config: &PanelConfig,
    direction: Direction,
) -> NeighborSlot {
    let rows = panel.occupancy.rows();
    let columns = panel.occupancy.columns();
    if rows == 0 || columns == 0 {
        return NeighborSlot::Hold;
    }

    let at_boundary = match direction {
        Direction::Up => cell.row == 0,
        Direction::Down => cell.row + cell.row_span >= rows,
        Direction::Left => cell.col == 0,
        Direction::Right => cell.col + cell.col_span >= columns,
    };
    if at_boundary {
        match config.exits.get(direction) {
            ExitRule::Target(target) => return NeighborSlot::External(target.clone()),
            ExitRule::Locked => return NeighborSlot::Hold,
            ExitRule::Unset => {}
        }
    }

    let bias = cell
        .bias
        .get(direction)
        .unwrap_or(*config.default_bias.get(direction));

    if direction.is_vertical() {
        let dest_row = match direction {
            Direction::Up => {
                if cell.row == 0 {
                    rows - 1
                } else {
                    cell.row - 1
                }
            }
            _ => {
                let below = cell.row + cell.row_span;
                if below >= rows { 0 } else { below }
            }
        };
        scan_span(panel, cell, bias, |col| (dest_row, col), cell.col, cell.col_span)
    } else {
        let dest_col = match direction {
            Direction::Left => {
                if cell.col == 0 {
                    columns - 1
                } else {
                    cell.col - 1
                }
            }
            _ => {
                let beyond = cell.col + cell.col_span;
                if beyond >= columns { 0 } else { beyond }
            }
        };
        scan_span(panel, cell, bias, |row| (row, dest_col), cell.row, cell.row_span)
    }
}

/// Read the destination slots across the cell's own perpendicular span, in
/// bias order, and return the first occupant that is not the cell itself.
fn scan_span(
    panel: &PackedPanel,
    cell: &PackedCell,
    bias: PerpendicularBias,
    slot_at: impl Fn(u16) -> (u16, u16),
    span_start: u16,
    span_len: u16,
) -> NeighborSlot {
    let coordinates: Vec<u16> = match bias {
        PerpendicularBias::First => (span_start..span_start + span_len).collect(),
        PerpendicularBias::Last => (span_start..span_start + span_len).rev().collect(),
    };
    for coordinate in coordinates {
        let (row, col) = slot_at(coordinate);
        if let Some(occupant) = panel.occupancy.occupant(row, col) {
            if occupant != &cell.id {
                return NeighborSlot::Cell(occupant.clone());
            }
        }
    }
    NeighborSlot::Hold
}
