use serde::{Deserialize, Serialize};

/// Pixel position within the host viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box reported by the host's geometry adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Direction of travel for a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Which point of a bounding box anchors directional distance comparison.
///
/// `Midpoint` uses the midpoint of the edge facing the travel direction.
/// `Natural` uses a corner chosen to bias toward reading order; the corner
/// assignment is intentionally asymmetric across directions and is kept as
/// an explicit table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceMode {
    Midpoint,
    #[default]
    Natural,
}

/// Reference point on the source element for travel in `direction`.
pub fn source_reference(bounds: &BoundingBox, direction: Direction, mode: ReferenceMode) -> Point {
    match mode {
        ReferenceMode::Midpoint => match direction {
            Direction::Up => Point::new(bounds.left + bounds.width / 2.0, bounds.top),
            Direction::Down => Point::new(bounds.left + bounds.width / 2.0, bounds.bottom()),
            Direction::Left => Point::new(bounds.left, bounds.top + bounds.height / 2.0),
            Direction::Right => Point::new(bounds.right(), bounds.top + bounds.height / 2.0),
        },
        ReferenceMode::Natural => match direction {
            Direction::Up => Point::new(bounds.left, bounds.top),
            Direction::Down => Point::new(bounds.left, bounds.bottom()),
            Direction::Left => Point::new(bounds.left, bounds.top),
            Direction::Right => Point::new(bounds.right(), bounds.top),
        },
    }
}

/// Reference point on a candidate element, taken on the face that would be
/// arriving from the source's travel direction.
pub fn candidate_reference(
    bounds: &BoundingBox,
    direction: Direction,
    mode: ReferenceMode,
) -> Point {
    match mode {
        ReferenceMode::Midpoint => match direction {
            Direction::Up => Point::new(bounds.left + bounds.width / 2.0, bounds.bottom()),
            Direction::Down => Point::new(bounds.left + bounds.width / 2.0, bounds.top),
            Direction::Left => Point::new(bounds.right(), bounds.top + bounds.height / 2.0),
            Direction::Right => Point::new(bounds.left, bounds.top + bounds.height / 2.0),
        },
        ReferenceMode::Natural => match direction {
            Direction::Up => Point::new(bounds.left, bounds.bottom()),
            Direction::Down => Point::new(bounds.left, bounds.top),
            Direction::Left => Point::new(bounds.right(), bounds.top),
            Direction::Right => Point::new(bounds.left, bounds.top),
        },
    }
}

/// Per-direction storage, used for overrides, exits, and chase-map rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Directional<T> {
    pub up: T,
    pub down: T,
    pub left: T,
    pub right: T,
}

impl<T> Directional<T> {
    pub fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    pub fn set(&mut self, direction: Direction, value: T) {
        *self.get_mut(direction) = value;
    }
}

/// Whether `candidate` lies strictly ahead of `source` along `direction`.
pub fn is_ahead(source: Point, candidate: Point, direction: Direction) -> bool {
    match direction {
        Direction::Up => candidate.y < source.y,
        Direction::Down => candidate.y > source.y,
        Direction::Left => candidate.x < source.x,
        Direction::Right => candidate.x > source.x,
    }
}
