use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::geometry::{BoundingBox, Direction};

/// Read-side contract onto the host's element geometry.
///
/// Geometry is read live at resolution time, never cached by the core.
/// Returning `None` from `bounding_box` marks the element as stale; stale
/// and invisible elements are skipped, never an error.
pub trait Geometry {
    fn bounding_box(&self, element_id: &str) -> Option<BoundingBox>;
    fn is_visible(&self, element_id: &str) -> bool;
}

/// Write-side contract for transferring focus.
///
/// Implementations must be idempotent; the session may re-focus an already
/// focused element.
pub trait FocusTarget {
    fn focus(&mut self, element_id: &str);
}

/// Classified navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Direction(Direction),
    Enter,
    None,
}

/// Map a raw host key event to a navigation key.
///
/// Key releases never navigate; repeats do, matching remote-control
/// auto-repeat behaviour.
pub fn classify(event: &KeyEvent) -> NavKey {
    if event.kind == KeyEventKind::Release {
        return NavKey::None;
    }
    match event.code {
        KeyCode::Up => NavKey::Direction(Direction::Up),
        KeyCode::Down => NavKey::Direction(Direction::Down),
        KeyCode::Left => NavKey::Direction(Direction::Left),
        KeyCode::Right => NavKey::Direction(Direction::Right),
        KeyCode::Enter => NavKey::Enter,
        _ => NavKey::None,
    }
}
