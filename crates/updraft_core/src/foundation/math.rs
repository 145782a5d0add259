//! Math utilities and types
//!
//! The world is 2D with screen-style axes: `x` grows to the right and `y`
//! grows downward, so climbing means a decreasing `y`.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// A circle collider in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// The center position of the circle in world space
    pub center: Vec2,
    /// The radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this circle intersects with another
    pub fn intersects(&self, other: &Circle) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Get the penetration depth if intersecting (0.0 if not intersecting)
    pub fn penetration_depth(&self, other: &Circle) -> f32 {
        let distance = (self.center - other.center).magnitude();
        let radius_sum = self.radius + other.radius;
        if distance < radius_sum {
            radius_sum - distance
        } else {
            0.0
        }
    }
}

/// Axis-aligned world bounds reported by the physics service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Left edge
    pub min_x: f32,
    /// Right edge
    pub max_x: f32,
    /// Top edge (highest point of the world)
    pub min_y: f32,
    /// Bottom edge (the ground)
    pub max_y: f32,
}

impl WorldBounds {
    /// Create new bounds
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Wrap an x coordinate so objects leaving one side re-enter on the other
    pub fn wrap_x(&self, x: f32, margin: f32) -> f32 {
        let left = self.min_x - margin;
        let right = self.max_x + margin;
        if x < left {
            right - (left - x)
        } else if x > right {
            left + (x - right)
        } else {
            x
        }
    }
}

/// Clamp each axis independently to `[-max, max]`, keeping its sign
///
/// This is not a length clamp: a diagonal vector can end up longer than `max`.
pub fn clamp_axes(v: Vec2, max: f32) -> Vec2 {
    Vec2::new(v.x.clamp(-max, max), v.y.clamp(-max, max))
}
