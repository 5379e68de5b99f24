use serde::{Deserialize, Serialize};

/// Planck constant, units of J s
pub const PLANCK: f64 = 6.626_069_57e-34;
/// Speed of light in vacuum, rounded the way the visualization uses it, units of m/s
pub const SPEED_OF_LIGHT: f64 = 3.0e8;
/// Electron rest mass, units of kg
pub const ELECTRON_MASS: f64 = 9.109_382_91e-31;
/// Compton wavelength of the electron h / (m_e c), units of m
pub const ELECTRON_COMPTON_WAVELENGTH: f64 = 2.426_310_238_9e-12;

/// Physical constants shared by every trial of a run.
///
/// The Compton wavelength is the tabulated value of `h / (m_e c)`, not
/// recomputed from the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Planck constant (J s)
    pub planck: f64,
    /// Speed of light (m/s)
    pub speed_of_light: f64,
    /// Electron rest mass (kg)
    pub electron_mass: f64,
    /// Electron Compton wavelength (m)
    pub compton_wavelength: f64,
}

impl PhysicalConstants {
    pub const fn new() -> Self {
        Self {
            planck: PLANCK,
            speed_of_light: SPEED_OF_LIGHT,
            electron_mass: ELECTRON_MASS,
            compton_wavelength: ELECTRON_COMPTON_WAVELENGTH,
        }
    }

    /// Electron rest energy m_e c^2 (J).
    pub fn electron_rest_energy(&self) -> f64 {
        self.electron_mass * self.speed_of_light.powi(2)
    }

    /// Photon frequency (Hz) for a wavelength (m).
    pub fn frequency(&self, wavelength: f64) -> f64 {
        self.speed_of_light / wavelength
    }

    /// Photon energy h f (J) for a wavelength (m).
    pub fn photon_energy(&self, wavelength: f64) -> f64 {
        self.planck * self.frequency(wavelength)
    }

    /// Photon momentum magnitude h / lambda (kg m/s).
    pub fn photon_momentum(&self, wavelength: f64) -> f64 {
        self.planck / wavelength
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::new()
    }
}
