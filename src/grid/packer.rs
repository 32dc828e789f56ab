use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;

use crate::error::{NavError, Result};
use crate::geometry::Directional;
use crate::grid::cell::{CellId, CellSpec};
use crate::grid::config::{PanelConfig, PerpendicularBias};
use crate::ids::IdAllocator;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::NavMetrics;

use crate::adapter::Override;

/// One grid slot. Margin gaps are recorded as occupied by the cell placed
/// just before them, so leftward navigation from a gap lands on the
/// predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(CellId),
}

/// Row-major occupancy of a packed panel. Read-only after packing; a
/// changed cell set rebuilds the whole map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMap {
    columns: u16,
    rows: Vec<Vec<Slot>>,
}

impl OccupancyMap {
    fn new(columns: u16) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Occupant of a slot, `None` for empty or out-of-range slots.
    pub fn occupant(&self, row: u16, col: u16) -> Option<&CellId> {
        let slot = self.rows.get(row as usize)?.get(col as usize)?;
        match slot {
            Slot::Empty => None,
            Slot::Occupied(id) => Some(id),
        }
    }

    fn ensure_rows(&mut self, count: u16) {
        while self.rows.len() < count as usize {
            self.rows.push(vec![Slot::Empty; self.columns as usize]);
        }
    }

    fn write(&mut self, row: u16, col: u16, id: &CellId) {
        self.ensure_rows(row + 1);
        self.rows[row as usize][col as usize] = Slot::Occupied(id.clone());
    }

    fn span_is_free(&self, row: u16, col: u16, row_span: u16, col_span: u16) -> bool {
        for r in row..row + row_span {
            for c in col..col + col_span {
                if self.occupant(r, c).is_some() {
                    return false;
                }
            }
        }
        true
    }

    fn write_span(&mut self, row: u16, col: u16, row_span: u16, col_span: u16, id: &CellId) {
        self.ensure_rows(row + row_span);
        for r in row..row + row_span {
            for c in col..col + col_span {
                self.rows[r as usize][c as usize] = Slot::Occupied(id.clone());
            }
        }
    }
}

/// A cell after placement: anchor slot, span, and the navigation hints the
/// adjacency compiler consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedCell {
    pub id: CellId,
    pub row: u16,
    pub col: u16,
    pub row_span: u16,
    pub col_span: u16,
    pub bias: Directional<Option<PerpendicularBias>>,
    pub overrides: Directional<Override>,
    pub alias: Option<String>,
}

/// Outcome summary of a pack run. Overflow is non-fatal; dropped cells are
/// listed here and warned through the logging channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackReport {
    pub placed: usize,
    pub dropped: Vec<CellId>,
    pub rows_used: u16,
}

/// A fully packed panel: occupancy plus per-cell placement records, keyed
/// by id with input order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPanel {
    pub occupancy: OccupancyMap,
    pub cells: HashMap<CellId, PackedCell>,
    pub order: Vec<CellId>,
    pub report: PackReport,
}

impl PackedPanel {
    pub fn cell(&self, id: &str) -> Option<&PackedCell> {
        self.cells.get(id)
    }
}

/// Pack cells into the grid in input order.
///
/// Cursor semantics: `margin_left` advances the cursor and marks the gap as
/// belonging to the predecessor; a cell wider than the remaining row wraps
/// to the next row; a collision with an earlier multi-row cell retries the
/// same cell one column further under a bounded retry loop; cells that no
/// longer fit once `max_rows` is exhausted are dropped, along with every
/// cell after them, and reported in the `PackReport`.
///
/// Deterministic: identical input and config always produce an identical
/// panel.
///
/// A successful run records one built panel, with its dropped-cell count,
/// on the metrics handle when one is supplied.
pub fn pack(
    specs: &[CellSpec],
    config: &PanelConfig,
    ids: &mut IdAllocator,
    logger: Option<&Logger>,
    metrics: Option<&Mutex<NavMetrics>>,
) -> Result<PackedPanel> {
    if specs.is_empty() {
        return Err(NavError::EmptyPanel);
    }
    if config.columns == 0 || config.column_unit == 0 || config.row_unit == 0 {
        return Err(NavError::InvalidDimension {
            id: "<panel>".to_string(),
            reason: "columns, column_unit and row_unit must be non-zero".to_string(),
        });
    }

    let columns = config.columns;
    let retry_bound = columns as usize * config.max_rows.max(1) as usize;

    let mut occupancy = OccupancyMap::new(columns);
    let mut cells: HashMap<CellId, PackedCell> = HashMap::new();
    let mut order: Vec<CellId> = Vec::new();
    let mut dropped: Vec<CellId> = Vec::new();

    let mut row: u16 = 0;
    let mut col: u16 = 0;
    let mut previous: Option<CellId> = None;
    let mut truncated = false;

    for spec in specs {
        let id = match &spec.id {
            Some(id) => id.clone(),
            None => ids.allocate(),
        };
        if cells.contains_key(&id) || dropped.contains(&id) {
            return Err(NavError::DuplicateCell(id));
        }
        spec.validate(&id, config)?;

        if truncated {
            dropped.push(id);
            continue;
        }

        let col_span = spec.column_span(config);
        let row_span = spec.row_span(config);

        if let Some(hint) = spec.row_hint {
            if hint >= config.max_rows {
                // A hint pointing past the panel can never be satisfied;
                // same policy as running out of rows.
                warn_overflow(logger, &id, hint);
                truncated = true;
                dropped.push(id);
                continue;
            }
            if hint > row {
                row = hint;
                col = 0;
            }
        }

        // Margin gap: skipped slots belong to the previous cell.
        let margin_cols = (spec.margin_left / config.column_unit) as u16;
        for _ in 0..margin_cols {
            if col >= columns {
                row += 1;
                col = 0;
            }
            if row >= config.max_rows {
                break;
            }
            if let Some(prev) = &previous {
                if occupancy.occupant(row, col).is_none() {
                    occupancy.write(row, col, prev);
                }
            }
            col += 1;
        }

        let mut retries = 0usize;
        loop {
            if col + col_span > columns {
                row += 1;
                col = 0;
            }
            if u32::from(row) + u32::from(row_span) > u32::from(config.max_rows) {
                truncated = true;
                break;
            }
            if occupancy.span_is_free(row, col, row_span, col_span) {
                break;
            }
            col += 1;
            retries += 1;
            if retries > retry_bound {
                return Err(NavError::CollisionRetry(id));
            }
        }

        if truncated {
            warn_overflow(logger, &id, row);
            dropped.push(id);
            continue;
        }

        occupancy.write_span(row, col, row_span, col_span, &id);
        cells.insert(
            id.clone(),
            PackedCell {
                id: id.clone(),
                row,
                col,
                row_span,
                col_span,
                bias: spec.bias.clone(),
                overrides: spec.hints.overrides.clone(),
                alias: spec.hints.alias.clone(),
            },
        );
        order.push(id.clone());
        previous = Some(id);
        col += col_span;
    }

    let report = PackReport {
        placed: order.len(),
        dropped,
        rows_used: occupancy.rows(),
    };

    if let Some(metrics) = metrics {
        if let Ok(mut guard) = metrics.lock() {
            guard.record_panel_built(report.dropped.len());
        }
    }

    Ok(PackedPanel {
        occupancy,
        cells,
        order,
        report,
    })
}

fn warn_overflow(logger: Option<&Logger>, id: &CellId, row: u16) {
    if let Some(logger) = logger {
        let event = event_with_fields(
            LogLevel::Warn,
            "nav::packer",
            "panel_overflow",
            [json_kv("cell", json!(id)), json_kv("row", json!(row))],
        );
        let _ = logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Logger, MemorySink};

    fn config(columns: u16, max_rows: u16) -> PanelConfig {
        PanelConfig::new(columns, 80, 80, max_rows)
    }

    fn unit_cell(id: &str) -> CellSpec {
        CellSpec::new(80, 80).with_id(id)
    }

    fn pack_all(specs: &[CellSpec], config: &PanelConfig) -> PackedPanel {
        let mut ids = IdAllocator::default();
        pack(specs, config, &mut ids, None, None).unwrap()
    }

    #[test]
    fn empty_input_is_a_configuration_error() {
        let mut ids = IdAllocator::default();
        let err = pack(&[], &config(3, 2), &mut ids, None, None).unwrap_err();
        assert!(matches!(err, NavError::EmptyPanel));
    }

    #[test]
    fn wide_cell_wraps_to_next_row() {
        // Widths 2u, 1u, 1u into 3 columns: third cell overflows to row 1.
        let specs = vec![
            CellSpec::new(160, 80).with_id("a"),
            unit_cell("b"),
            unit_cell("c"),
        ];
        let panel = pack_all(&specs, &config(3, 2));

        assert_eq!(panel.occupancy.occupant(0, 0), Some(&"a".to_string()));
        assert_eq!(panel.occupancy.occupant(0, 1), Some(&"a".to_string()));
        assert_eq!(panel.occupancy.occupant(0, 2), Some(&"b".to_string()));
        assert_eq!(panel.occupancy.occupant(1, 0), Some(&"c".to_string()));
        assert!(panel.report.dropped.is_empty());
    }

    #[test]
    fn no_two_cells_share_a_slot() {
        // Without margins, every occupied slot is claimed by exactly one
        // cell, so per-id slot counts must match the declared spans.
        let specs = vec![
            CellSpec::new(80, 160).with_id("tall"),
            unit_cell("b"),
            unit_cell("c"),
            unit_cell("d"),
            unit_cell("e"),
        ];
        let panel = pack_all(&specs, &config(3, 3));

        let mut counts: HashMap<CellId, u32> = HashMap::new();
        for r in 0..panel.occupancy.rows() {
            for c in 0..panel.occupancy.columns() {
                if let Some(id) = panel.occupancy.occupant(r, c) {
                    *counts.entry(id.clone()).or_default() += 1;
                }
            }
        }
        for id in &panel.order {
            let cell = panel.cell(id).unwrap();
            let expected = u32::from(cell.row_span) * u32::from(cell.col_span);
            assert_eq!(counts.get(id), Some(&expected), "cell {id}");
        }
        let total: u32 = counts.values().sum();
        let declared: u32 = panel
            .order
            .iter()
            .map(|id| {
                let cell = panel.cell(id).unwrap();
                u32::from(cell.row_span) * u32::from(cell.col_span)
            })
            .sum();
        assert_eq!(total, declared);
    }

    #[test]
    fn span_covers_declared_slot_count() {
        let specs = vec![CellSpec::new(160, 160).with_id("big"), unit_cell("b")];
        let panel = pack_all(&specs, &config(4, 3));
        let big = panel.cell("big").unwrap();

        let mut covered = 0;
        for r in 0..panel.occupancy.rows() {
            for c in 0..panel.occupancy.columns() {
                if panel.occupancy.occupant(r, c) == Some(&"big".to_string()) {
                    covered += 1;
                }
            }
        }
        assert_eq!(covered, (big.row_span * big.col_span) as usize);
        assert_eq!(covered, 4);
    }

    #[test]
    fn collision_with_multi_row_spill_retries_next_column() {
        // "tall" spills into row 1 at column 0; the first cell of row 1
        // must shift right rather than overlap it.
        let specs = vec![
            CellSpec::new(80, 160).with_id("tall"),
            unit_cell("b"),
            unit_cell("c"),
            unit_cell("d"),
        ];
        let panel = pack_all(&specs, &config(3, 2));

        assert_eq!(panel.occupancy.occupant(1, 0), Some(&"tall".to_string()));
        let d = panel.cell("d").unwrap();
        assert_eq!((d.row, d.col), (1, 1));
    }

    #[test]
    fn margin_slots_belong_to_predecessor() {
        let specs = vec![
            unit_cell("a"),
            CellSpec::new(80, 80).with_id("b").with_margin_left(80),
        ];
        let panel = pack_all(&specs, &config(4, 1));

        assert_eq!(panel.occupancy.occupant(0, 0), Some(&"a".to_string()));
        // Gap column carries the predecessor's id.
        assert_eq!(panel.occupancy.occupant(0, 1), Some(&"a".to_string()));
        assert_eq!(panel.occupancy.occupant(0, 2), Some(&"b".to_string()));
    }

    #[test]
    fn overflow_drops_remaining_cells_and_warns() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        let specs = vec![
            unit_cell("a"),
            unit_cell("b"),
            unit_cell("c"),
            unit_cell("d"),
        ];
        let mut ids = IdAllocator::default();
        let panel = pack(&specs, &config(2, 1), &mut ids, Some(&logger), None).unwrap();

        assert_eq!(panel.report.placed, 2);
        assert_eq!(panel.report.dropped, vec!["c".to_string(), "d".to_string()]);
        assert!(panel.cell("c").is_none());

        let events = sink.events();
        assert!(
            events
                .iter()
                .any(|event| event.message == "panel_overflow")
        );
    }

    #[test]
    fn generated_ids_fill_missing_ones() {
        let specs = vec![CellSpec::new(80, 80), CellSpec::new(80, 80)];
        let panel = pack_all(&specs, &config(4, 1));
        assert_eq!(panel.order, vec!["nav-0".to_string(), "nav-1".to_string()]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let specs = vec![unit_cell("same"), unit_cell("same")];
        let mut ids = IdAllocator::default();
        let err = pack(&specs, &config(4, 1), &mut ids, None, None).unwrap_err();
        assert!(matches!(err, NavError::DuplicateCell(id) if id == "same"));
    }

    #[test]
    fn row_hint_past_the_panel_drops_instead_of_panicking() {
        let specs = vec![unit_cell("a").with_row_hint(u16::MAX), unit_cell("b")];
        let panel = pack_all(&specs, &config(3, 2));

        assert_eq!(panel.report.placed, 0);
        assert_eq!(panel.report.dropped, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn pack_records_panel_metrics() {
        let metrics = Mutex::new(NavMetrics::new());
        let specs = vec![unit_cell("a"), unit_cell("b"), unit_cell("c")];
        let mut ids = IdAllocator::default();
        pack(&specs, &config(2, 1), &mut ids, None, Some(&metrics)).unwrap();

        let snapshot = metrics
            .lock()
            .unwrap()
            .snapshot(std::time::Duration::from_secs(0));
        assert_eq!(snapshot.panels_built, 1);
        assert_eq!(snapshot.cells_dropped, 1);
    }

    #[test]
    fn row_hint_jumps_the_cursor() {
        let specs = vec![unit_cell("a"), unit_cell("b").with_row_hint(1)];
        let panel = pack_all(&specs, &config(4, 2));
        let b = panel.cell("b").unwrap();
        assert_eq!((b.row, b.col), (1, 0));
    }

    #[test]
    fn packing_is_deterministic() {
        let specs = vec![
            CellSpec::new(160, 160).with_id("a"),
            unit_cell("b"),
            CellSpec::new(80, 80).with_id("c").with_margin_left(80),
            unit_cell("d"),
        ];
        let cfg = config(4, 3);
        let first = pack_all(&specs, &cfg);
        let second = pack_all(&specs, &cfg);
        assert_eq!(first, second);
    }
}
