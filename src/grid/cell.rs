use crate::adapter::{NavHints, Override};
use crate::error::{NavError, Result};
use crate::geometry::{Direction, Directional};
use crate::grid::config::{PanelConfig, PerpendicularBias};

/// Cell identifier within a panel.
pub type CellId = String;

/// Immutable descriptor for one focusable cell, in pixels.
///
/// Built once by authoring code, validated and consumed by the packer. The
/// id is optional; the packer asks its id allocator for one when absent.
#[derive(Debug, Clone, Default)]
pub struct CellSpec {
    pub id: Option<CellId>,
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    /// Jump the packing cursor to this row before placement.
    pub row_hint: Option<u16>,
    /// Per-direction perpendicular tie-break, overriding the panel default.
    pub bias: Directional<Option<PerpendicularBias>>,
    /// Declarative overrides and alias, usually parsed from a `nav-*`
    /// attribute string.
    pub hints: NavHints,
}

impl CellSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<CellId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_margin_left(mut self, margin: u32) -> Self {
        self.margin_left = margin;
        self
    }

    pub fn with_row_hint(mut self, row: u16) -> Self {
        self.row_hint = Some(row);
        self
    }

    pub fn with_bias(mut self, direction: Direction, bias: PerpendicularBias) -> Self {
        self.bias.set(direction, Some(bias));
        self
    }

    pub fn with_hints(mut self, hints: NavHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_override(mut self, direction: Direction, value: Override) -> Self {
        self.hints.overrides.set(direction, value);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.hints.alias = Some(alias.into());
        self
    }

    /// Columns this cell covers.
    pub fn column_span(&self, config: &PanelConfig) -> u16 {
        u16::try_from(self.width.div_ceil(config.column_unit.max(1))).unwrap_or(u16::MAX)
    }

    /// Row units this cell covers.
    pub fn row_span(&self, config: &PanelConfig) -> u16 {
        u16::try_from(self.height.div_ceil(config.row_unit.max(1))).unwrap_or(u16::MAX)
    }

    pub(crate) fn validate(&self, id: &CellId, config: &PanelConfig) -> Result<()> {
        if self.width == 0 {
            return Err(NavError::InvalidDimension {
                id: id.clone(),
                reason: "width is zero".to_string(),
            });
        }
        if self.height == 0 {
            return Err(NavError::InvalidDimension {
                id: id.clone(),
                reason: "height is zero".to_string(),
            });
        }
        if self.column_span(config) > config.columns {
            return Err(NavError::CellTooWide {
                id: id.clone(),
                width: self.width,
                available: config.panel_width(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_round_up_to_whole_units() {
        let config = PanelConfig::new(6, 80, 60, 4);
        let cell = CellSpec::new(160, 60);
        assert_eq!(cell.column_span(&config), 2);
        assert_eq!(cell.row_span(&config), 1);

        let tall = CellSpec::new(80, 90);
        assert_eq!(tall.row_span(&config), 2);
    }

    #[test]
    fn zero_dimensions_fail_validation() {
        let config = PanelConfig::default();
        let id = "k0".to_string();
        assert!(CellSpec::new(0, 10).validate(&id, &config).is_err());
        assert!(CellSpec::new(10, 0).validate(&id, &config).is_err());
    }

    #[test]
    fn too_wide_cell_fails_validation() {
        let config = PanelConfig::new(3, 80, 80, 2);
        let cell = CellSpec::new(400, 80);
        let err = cell.validate(&"wide".to_string(), &config).unwrap_err();
        assert!(matches!(err, NavError::CellTooWide { .. }));
    }

    #[test]
    fn builder_collects_hints() {
        let cell = CellSpec::new(80, 80)
            .with_id("k1")
            .with_alias("back")
            .with_override(Direction::Up, Override::Blocked)
            .with_bias(Direction::Down, PerpendicularBias::Last);
        assert_eq!(cell.id.as_deref(), Some("k1"));
        assert_eq!(cell.hints.alias.as_deref(), Some("back"));
        assert_eq!(cell.hints.overrides.up, Override::Blocked);
        assert_eq!(cell.bias.down, Some(PerpendicularBias::Last));
    }
}
