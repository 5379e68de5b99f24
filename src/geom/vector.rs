use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Free 3D vector.
///
/// Used both for scene displacements (display units) and for physical
/// momenta and velocities (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn zero() -> Self {
        Self::new(0., 0., 0.)
    }

    /// Vector of the given length lying in the XY plane at `angle` from +X.
    pub fn from_polar_xy(length: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(length * cos, length * sin, 0.)
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Direction of the XY projection measured from +X, in (-pi, pi].
    ///
    /// Returns None for a vector with no XY component, whose direction is
    /// undefined.
    pub fn angle_xy(&self) -> Option<f64> {
        if self.dx == 0. && self.dy == 0. {
            None
        } else {
            Some(self.dy.atan2(self.dx))
        }
    }
}

// Implement +
impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
}

// Implement -
impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
}

// Implement *
impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            dx: self.dx * other,
            dy: self.dy * other,
            dz: self.dz * other,
        }
    }
}

// Implement /
// Physical masses are tiny (~1e-30 kg), so only an exactly zero or
// non-finite divisor is rejected.
impl Div<f64> for Vector {
    type Output = Option<Self>;
    fn div(self, other: f64) -> Option<Self> {
        if other == 0. || !other.is_finite() {
            None
        } else {
            Some(Self {
                dx: self.dx / other,
                dy: self.dy / other,
                dz: self.dz / other,
            })
        }
    }
}
