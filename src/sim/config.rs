use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::physics::{Photon, PhysicalConstants};

/// Configuration of a batch of scattering trials.
///
/// Missing fields in a JSON file fall back to the defaults of [`TrialConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    // Batch
    pub trial_count: usize,
    /// If set, angle sampling is reproducible across runs.
    pub seed: Option<u64>,
    /// Number of times a trial draws a new angle after a degenerate recoil.
    pub max_resamples: usize,

    // Physics
    pub constants: PhysicalConstants,
    /// Wavelength of every incoming photon (m).
    pub initial_wavelength: f64,

    // Clock
    /// Simulated time per tick (s).
    pub dt: f64,
    /// Ratio of elapsed time to actual time.
    pub scalefactor_time: f64,
    /// Ratio of displayed length to actual length (wave drawing only).
    pub scalefactor_length: f64,
    pub post_collision_ticks: usize,
    /// Upper bound on approach ticks in case the photon never reaches the electron.
    pub max_approach_ticks: usize,

    // Playback
    /// Maximum ticks per second when `realtime` is on.
    pub animation_run_rate: u32,
    /// Sleep between ticks to pace playback; off for headless runs.
    pub realtime: bool,

    // Scene (display units)
    /// X coordinate of the photon's trailing end at reset.
    pub photon_start_x: f64,
    /// Number of polyline samples (one per display unit) of the photon wave.
    pub photon_samples: usize,
    pub photon_amplitude: f64,
    pub electron_position: Point,
    pub electron_radius: f64,
}

impl TrialConfig {
    pub fn new() -> Self {
        Self {
            trial_count: 100,
            seed: None,
            max_resamples: 8,
            constants: PhysicalConstants::new(),
            initial_wavelength: 1e-12,
            dt: 0.05,
            scalefactor_time: 2e7,
            scalefactor_length: 1e20,
            post_collision_ticks: 300,
            max_approach_ticks: 10_000,
            animation_run_rate: 100,
            realtime: false,
            photon_start_x: -200.,
            photon_samples: 20,
            photon_amplitude: 7.,
            electron_position: Point::origin(),
            electron_radius: 10.,
        }
    }

    /// Reads a configuration from a JSON file and validates it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let config: TrialConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse trial config: {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Distance the photon travels per tick (display units).
    pub fn photon_step(&self) -> f64 {
        self.constants.speed_of_light * self.dt / self.scalefactor_time
    }

    /// Checks that every physical and timing parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("initial_wavelength", self.initial_wavelength),
            ("dt", self.dt),
            ("scalefactor_time", self.scalefactor_time),
            ("scalefactor_length", self.scalefactor_length),
            ("planck", self.constants.planck),
            ("speed_of_light", self.constants.speed_of_light),
            ("electron_mass", self.constants.electron_mass),
            ("compton_wavelength", self.constants.compton_wavelength),
        ];
        for (name, value) in positive {
            if !(value > 0. && value.is_finite()) {
                anyhow::bail!("{name} must be positive and finite, got {value}");
            }
        }
        Photon::new(self.initial_wavelength, 0., &self.constants)
            .context("initial_wavelength does not describe a representable photon")?;
        if self.photon_samples < 2 {
            anyhow::bail!(
                "photon_samples must be at least 2, got {}",
                self.photon_samples
            );
        }
        if self.animation_run_rate == 0 {
            anyhow::bail!("animation_run_rate must be positive");
        }
        if self.max_approach_ticks == 0 {
            anyhow::bail!("max_approach_ticks must be positive");
        }
        Ok(())
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self::new()
    }
}
