use crate::Vector;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Position in scene (display) units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(0., 0., 0.)
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS
            && (self.y - other.y).abs() < EPS
            && (self.z - other.z).abs() < EPS
    }

    /// Rotates the point about the Z axis passing through the origin.
    ///
    /// Used to map shapes drawn along +X into a frame whose axis is
    /// `(cos angle, sin angle, 0)`.
    pub fn rotate_z(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }
}

// Implement +
impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
            z: self.z + other.dz,
        }
    }
}

// Implement +=
impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, other: Vector) {
        *self = *self + other;
    }
}
