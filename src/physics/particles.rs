use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::physics::constants::PhysicalConstants;
use crate::physics::error::ScatterError;

/// Kinematic state of the photon.
///
/// All derived quantities are filled in by [`Photon::new`], so the struct is
/// always internally consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    /// Wavelength (m)
    pub wavelength: f64,
    /// Frequency (Hz)
    pub frequency: f64,
    /// Energy (J)
    pub energy: f64,
    /// Momentum (kg m/s), magnitude h / wavelength
    pub momentum: Vector,
    /// Propagation direction measured from +X (rad)
    pub angle: f64,
}

impl Photon {
    /// Creates a photon of the given wavelength travelling at `angle` from +X.
    pub fn new(
        wavelength: f64,
        angle: f64,
        constants: &PhysicalConstants,
    ) -> Result<Self, ScatterError> {
        if !(wavelength > 0. && wavelength.is_finite()) {
            return Err(ScatterError::InvalidWavelength { wavelength });
        }
        let photon = Self {
            wavelength,
            frequency: constants.frequency(wavelength),
            energy: constants.photon_energy(wavelength),
            momentum: Vector::from_polar_xy(constants.photon_momentum(wavelength), angle),
            angle,
        };
        // Subnormal wavelengths overflow the derived quantities
        if !(photon.frequency.is_finite()
            && photon.energy.is_finite()
            && photon.momentum.length().is_finite())
        {
            return Err(ScatterError::InvalidWavelength { wavelength });
        }
        Ok(photon)
    }

    /// On-screen label text.
    pub fn label(&self) -> String {
        format!(
            "Photon\nλ = {:.4e} meters\n∡ = {:.4} π radians",
            self.wavelength,
            self.angle / std::f64::consts::PI
        )
    }
}

/// Kinematic state of the electron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Electron {
    /// Rest mass (kg)
    pub rest_mass: f64,
    /// Rest energy m c^2 (J)
    pub rest_energy: f64,
    /// Momentum (kg m/s)
    pub momentum: Vector,
    /// Total relativistic energy (J)
    pub energy: f64,
    /// Relativistic mass E / c^2 (kg)
    pub mass: f64,
    /// Velocity p / m_rel (m/s)
    pub velocity: Vector,
    /// Speed |v| (m/s)
    pub speed: f64,
    /// Direction of motion measured from +X (rad); None while at rest
    pub recoil_angle: Option<f64>,
}

impl Electron {
    /// Electron at rest: zero momentum, energy and mass equal to rest values.
    pub fn at_rest(constants: &PhysicalConstants) -> Self {
        Self {
            rest_mass: constants.electron_mass,
            rest_energy: constants.electron_rest_energy(),
            momentum: Vector::zero(),
            energy: constants.electron_rest_energy(),
            mass: constants.electron_mass,
            velocity: Vector::zero(),
            speed: 0.,
            recoil_angle: None,
        }
    }

    /// Lorentz factor implied by the relativistic mass.
    pub fn gamma(&self) -> f64 {
        self.mass / self.rest_mass
    }

    /// Kinetic energy E - m c^2 (J).
    pub fn kinetic_energy(&self) -> f64 {
        self.energy - self.rest_energy
    }

    /// On-screen label text.
    pub fn label(&self) -> String {
        match self.recoil_angle {
            Some(angle) => format!(
                "Electron\nv = {:.4e} m/s\n∡ = {:.4} π radians",
                self.speed,
                angle / std::f64::consts::PI
            ),
            None => format!("Electron\nv = {:.4e} m/s\n", self.speed),
        }
    }
}
