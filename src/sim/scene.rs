//! Display-space state of the two animated particles.
//!
//! Positions here are in scene units (the visible range is about ±200). The
//! SI quantities in [`crate::physics`] only reach this module through the two
//! scale factors of [`TrialConfig`].

use std::f64::consts::PI;

use crate::sim::config::TrialConfig;
use crate::sim::frame::{ObjectId, ObjectUpdate, Tint};
use crate::{Point, Vector};

/// Photon drawn as a sine wave travelling along its frame axis.
///
/// The wave lives in a local frame whose +X axis points along the direction
/// of travel. Translating the photon slides its samples along local X while
/// the sine stays fixed in space, so the crests appear to move through it.
/// Rotating the frame at the collision swings the wave about the scene origin.
#[derive(Debug, Clone)]
pub struct PhotonWave {
    start_x: f64,
    samples: usize,
    amplitude: f64,
    /// Displayed spatial frequency: photon frequency / scalefactor_length
    spatial_frequency: f64,
    /// Local displacement along the frame axis
    offset: f64,
    /// Frame axis measured from +X (rad)
    axis_angle: f64,
    tint: Tint,
}

impl PhotonWave {
    pub fn new(config: &TrialConfig, frequency: f64) -> Self {
        Self {
            start_x: config.photon_start_x,
            samples: config.photon_samples,
            amplitude: config.photon_amplitude,
            spatial_frequency: frequency / config.scalefactor_length,
            offset: 0.,
            axis_angle: 0.,
            tint: Tint::Initial,
        }
    }

    fn local_x(&self, i: usize) -> f64 {
        self.start_x + i as f64 + self.offset
    }

    fn local_point(&self, i: usize) -> Point {
        let x = self.local_x(i);
        let y = self.amplitude * (self.spatial_frequency * x / (2. * PI)).sin();
        Point::new(x, y, 0.)
    }

    /// Wave polyline in scene coordinates.
    pub fn points(&self) -> Vec<Point> {
        (0..self.samples)
            .map(|i| self.local_point(i).rotate_z(self.axis_angle))
            .collect()
    }

    /// Local X of the front sample, compared against the electron position
    /// to detect the impact.
    pub fn leading_x(&self) -> f64 {
        self.local_x(self.samples.saturating_sub(1))
    }

    /// Front of the wave on its axis, in scene coordinates.
    pub fn leading_edge(&self) -> Point {
        Point::new(self.leading_x(), 0., 0.).rotate_z(self.axis_angle)
    }

    /// Moves the wave forward along its frame axis.
    pub fn advance(&mut self, distance: f64) {
        self.offset += distance;
    }

    /// Turns the frame to the scattering angle and redraws the wave at the
    /// scattered frequency.
    pub fn deflect(&mut self, angle: f64, frequency: f64, scalefactor_length: f64) {
        self.axis_angle = angle;
        self.spatial_frequency = frequency / scalefactor_length;
        self.tint = Tint::Scattered;
    }

    pub fn axis_angle(&self) -> f64 {
        self.axis_angle
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    pub fn update(&self, label: String) -> ObjectUpdate {
        ObjectUpdate {
            id: ObjectId::Photon,
            position: self.leading_edge(),
            shape: self.points(),
            tint: self.tint,
            label,
        }
    }
}

/// Electron drawn as a sphere.
#[derive(Debug, Clone)]
pub struct ElectronBall {
    position: Point,
    radius: f64,
}

impl ElectronBall {
    pub fn new(config: &TrialConfig) -> Self {
        Self {
            position: config.electron_position,
            radius: config.electron_radius,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Moves the sphere by a scene-space displacement.
    pub fn advance(&mut self, displacement: Vector) {
        self.position += displacement;
    }

    pub fn update(&self, label: String) -> ObjectUpdate {
        ObjectUpdate {
            id: ObjectId::Electron,
            position: self.position,
            shape: Vec::new(),
            tint: Tint::Initial,
            label,
        }
    }
}
