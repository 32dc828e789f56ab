use crate::adapter::{Geometry, NavHints, Override};
use crate::geometry::{
    Direction, Directional, ReferenceMode, candidate_reference, is_ahead, source_reference,
};
use crate::grid::ExitRule;

/// Free-form registry entry. Geometry stays in the host and is read live
/// at resolve time, so the element only carries identity and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigableElement {
    pub id: String,
    pub overrides: Directional<Override>,
    pub alias: Option<String>,
}

impl NavigableElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            overrides: Directional::default(),
            alias: None,
        }
    }

    pub fn with_hints(id: impl Into<String>, hints: NavHints) -> Self {
        Self {
            id: id.into(),
            overrides: hints.overrides,
            alias: hints.alias,
        }
    }
}

/// Outcome of one resolution. Never an error: a key press that finds no
/// candidate is an expected terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Focus should move to this registered element.
    Target(String),
    /// Focus leaves the registry through a configured exit.
    Exit(String),
    /// Input consumed, focus stays put.
    Hold,
    /// Nothing ahead and no exit; the caller should still suppress any
    /// default scrolling behaviour for the key.
    NoTarget,
}

/// Find the closest element strictly ahead of `source_id` in `direction`.
///
/// Overrides short-circuit the search: `Blocked` holds, an explicit element
/// id is used verbatim with no visibility or geometry checks, and an alias
/// resolves against registered aliases (falling back to the search when the
/// alias names nothing). Otherwise candidates are ranked by Euclidean
/// distance between directional reference points, ties going to the element
/// registered first.
pub fn resolve(
    elements: &[NavigableElement],
    geometry: &dyn Geometry,
    source_id: &str,
    direction: Direction,
    mode: ReferenceMode,
    exits: &Directional<ExitRule>,
) -> Resolution {
    let Some(source) = elements.iter().find(|element| element.id == source_id) else {
        return Resolution::NoTarget;
    };

    match source.overrides.get(direction) {
        Override::Blocked => return Resolution::Hold,
        Override::Element(target) => return Resolution::Target(target.clone()),
        Override::Alias(name) => {
            let aliased = elements
                .iter()
                .find(|element| element.alias.as_deref() == Some(name.as_str()));
            if let Some(element) = aliased {
                return Resolution::Target(element.id.clone());
            }
        }
        Override::Unset => {}
    }

    let Some(bounds) = geometry.bounding_box(source_id) else {
        return exit_fallback(exits, direction);
    };
    let origin = source_reference(&bounds, direction, mode);

    let mut best: Option<(f64, &str)> = None;
    for element in elements {
        if element.id == source_id {
            continue;
        }
        if !geometry.is_visible(&element.id) {
            continue;
        }
        let Some(candidate_bounds) = geometry.bounding_box(&element.id) else {
            continue;
        };
        let candidate = candidate_reference(&candidate_bounds, direction, mode);
        if !is_ahead(origin, candidate, direction) {
            continue;
        }
        let distance = origin.distance_to(candidate);
        // Strict comparison keeps the first-registered element on ties.
        if best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, element.id.as_str()));
        }
    }

    match best {
        Some((_, id)) => Resolution::Target(id.to_string()),
        None => exit_fallback(exits, direction),
    }
}

fn exit_fallback(exits: &Directional<ExitRule>, direction: Direction) -> Resolution {
    match exits.get(direction) {
        ExitRule::Target(target) => Resolution::Exit(target.clone()),
        ExitRule::Locked => Resolution::Hold,
        ExitRule::Unset => Resolution::NoTarget,
    }
}
