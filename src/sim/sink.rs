use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::physics::ComptonModel;
use crate::sim::frame::FrameUpdate;

/// One point of the wavelength shift vs. scattering angle plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSample {
    /// Zero-based trial index within the batch.
    pub trial: usize,
    /// Scattering angle in (-pi, pi] (rad)
    pub angle: f64,
    /// Wavelength shift (m)
    pub shift: f64,
    /// Scattered photon wavelength (m)
    pub wavelength: f64,
    /// Electron recoil speed (m/s)
    pub recoil_speed: f64,
    /// Electron recoil direction (rad)
    pub recoil_angle: f64,
}

/// Consumes per-tick draw updates.
pub trait Renderer {
    fn update(&mut self, frame: &FrameUpdate) -> Result<()>;
}

/// Consumes one sample per completed trial.
pub trait PlotCollector {
    fn record(&mut self, sample: &TrialSample) -> Result<()>;
}

/// Renderer for headless runs.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn update(&mut self, _frame: &FrameUpdate) -> Result<()> {
        Ok(())
    }
}

/// Renderer that keeps every frame in memory.
#[derive(Default)]
pub struct FrameRecorder {
    frames: Vec<FrameUpdate>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameUpdate] {
        &self.frames
    }

    /// Frames of a single trial.
    pub fn trial(&self, trial: usize) -> impl Iterator<Item = &FrameUpdate> {
        self.frames.iter().filter(move |f| f.trial == trial)
    }
}

impl Renderer for FrameRecorder {
    fn update(&mut self, frame: &FrameUpdate) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Append-only in-memory scatter plot.
#[derive(Default)]
pub struct ScatterPlot {
    samples: Vec<TrialSample>,
}

impl ScatterPlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[TrialSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest recorded shift, None when empty.
    pub fn max_shift(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.shift).reduce(f64::max)
    }

    /// Largest distance between a recorded point and the Compton curve.
    pub fn max_deviation(&self, model: &ComptonModel) -> f64 {
        self.samples
            .iter()
            .map(|s| (s.shift - model.compton_shift(s.angle)).abs())
            .fold(0., f64::max)
    }
}

impl PlotCollector for ScatterPlot {
    fn record(&mut self, sample: &TrialSample) -> Result<()> {
        self.samples.push(*sample);
        Ok(())
    }
}
