//! # Spatial Components
//!
//! Position, velocity and draw layer.

use serde::{Deserialize, Serialize};

/// A point in world units.
///
/// # Examples
///
/// ```
/// use riftbound::Position;
///
/// let a = Position::new(0.0, 0.0);
/// let b = Position::new(3.0, 4.0);
/// assert_eq!(a.distance(b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(self, other: Position) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance, for comparisons that don't need the root.
    pub fn distance_squared(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Unit vector pointing at `other`, or `(0, 0)` if both points coincide.
    pub fn direction_to(self, other: Position) -> (f32, f32) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            (0.0, 0.0)
        } else {
            (dx / length, dy / length)
        }
    }

    /// Position displaced by a velocity over `delta_time` seconds.
    pub fn advanced(self, velocity: Velocity, delta_time: f32) -> Self {
        Self::new(
            self.x + velocity.vx * delta_time,
            self.y + velocity.vy * delta_time,
        )
    }
}

/// Movement per second in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    /// Creates a new velocity.
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    /// A velocity of zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Velocity of `speed` pointing from `from` towards `to`.
    pub fn toward(from: Position, to: Position, speed: f32) -> Self {
        let (dx, dy) = from.direction_to(to);
        Self::new(dx * speed, dy * speed)
    }

    /// Length of the velocity vector.
    pub fn magnitude(self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Scales the vector down so its magnitude does not exceed `max`.
    pub fn clamped(self, max: f32) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= max || magnitude <= f32::EPSILON {
            self
        } else {
            let scale = max / magnitude;
            Self::new(self.vx * scale, self.vy * scale)
        }
    }

    /// Uniformly scaled copy.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.vx * factor, self.vy * factor)
    }
}

/// Draw ordering for the renderer. Higher layers draw on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Layer {
    pub depth: i32,
}

impl Layer {
    pub const GROUND: Layer = Layer { depth: 0 };
    pub const ACTORS: Layer = Layer { depth: 10 };
    pub const PROJECTILES: Layer = Layer { depth: 20 };
    pub const EFFECTS: Layer = Layer { depth: 30 };

    /// Creates a layer at an arbitrary depth.
    pub fn new(depth: i32) -> Self {
        Self { depth }
    }
}
