use crate::error::{NavError, Result};
use crate::geometry::{Direction, Directional};

/// Per-direction adjacency override.
///
/// The declarative attribute lets authors pin a neighbor, block a direction
/// outright, or defer to an alias that resolves against packed cells. The
/// tagged variants keep "no override" and "explicitly no movement" distinct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Override {
    #[default]
    Unset,
    Blocked,
    Element(String),
    Alias(String),
}

/// Parsed form of an element's declarative navigation attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavHints {
    pub overrides: Directional<Override>,
    pub alias: Option<String>,
}

impl NavHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, direction: Direction, value: Override) -> Self {
        self.overrides.set(direction, value);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Parse a CSS-property-like adjacency attribute.
///
/// Grammar, one declaration per `;`-separated entry:
///
/// ```text
/// nav-up: k3;            // explicit neighbor id
/// nav-down: none;        // blocked, input consumed
/// nav-left-alias: back;  // resolve against another cell's alias
/// alias: period;         // this element's own alias name
/// ```
///
/// Parsed once per registration and cached by the caller; unknown
/// properties and empty values are authoring mistakes.
pub fn parse_nav_hints(attribute: &str) -> Result<NavHints> {
    let mut hints = NavHints::new();

    for entry in attribute.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (property, value) = entry
            .split_once(':')
            .ok_or_else(|| NavError::MalformedHint(format!("missing `:` in `{entry}`")))?;
        let property = property.trim();
        let value = value.trim();
        if value.is_empty() {
            return Err(NavError::MalformedHint(format!(
                "empty value for `{property}`"
            )));
        }

        match property {
            "alias" => hints.alias = Some(value.to_string()),
            _ => {
                let (direction, is_alias) = parse_property(property)?;
                let slot = hints.overrides.get_mut(direction);
                *slot = if is_alias {
                    Override::Alias(value.to_string())
                } else if value == "none" {
                    Override::Blocked
                } else {
                    Override::Element(value.to_string())
                };
            }
        }
    }

    Ok(hints)
}

fn parse_property(property: &str) -> Result<(Direction, bool)> {
    let body = property
        .strip_prefix("nav-")
        .ok_or_else(|| NavError::MalformedHint(format!("unknown property `{property}`")))?;
    let (name, is_alias) = match body.strip_suffix("-alias") {
        Some(name) => (name, true),
        None => (body, false),
    };
    let direction = match name {
        "up" => Direction::Up,
        "down" => Direction::Down,
        "left" => Direction::Left,
        "right" => Direction::Right,
        other => {
            return Err(NavError::MalformedHint(format!(
                "unknown direction `{other}`"
            )));
        }
    };
    Ok((direction, is_alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_and_blocked() {
        let hints = parse_nav_hints("nav-up: k3; nav-down: none;").unwrap();
        assert_eq!(hints.overrides.up, Override::Element("k3".to_string()));
        assert_eq!(hints.overrides.down, Override::Blocked);
        assert_eq!(hints.overrides.left, Override::Unset);
    }

    #[test]
    fn parses_alias_forms() {
        let hints = parse_nav_hints("nav-left-alias: back; alias: period").unwrap();
        assert_eq!(hints.overrides.left, Override::Alias("back".to_string()));
        assert_eq!(hints.alias.as_deref(), Some("period"));
    }

    #[test]
    fn tolerates_whitespace_and_trailing_separator() {
        let hints = parse_nav_hints("  nav-right :  ok  ; ").unwrap();
        assert_eq!(hints.overrides.right, Override::Element("ok".to_string()));
    }

    #[test]
    fn rejects_unknown_property() {
        assert!(parse_nav_hints("focus-up: k1").is_err());
        assert!(parse_nav_hints("nav-diagonal: k1").is_err());
    }

    #[test]
    fn rejects_missing_colon_and_empty_value() {
        assert!(parse_nav_hints("nav-up k3").is_err());
        assert!(parse_nav_hints("nav-up: ").is_err());
    }

    #[test]
    fn empty_attribute_is_no_hints() {
        assert_eq!(parse_nav_hints("").unwrap(), NavHints::new());
    }
}
