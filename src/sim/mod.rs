//! Tick-stepped scattering trials.
//!
//! [`TrialRunner`] owns the clock and the angle generator and talks to the
//! outside world only through the [`Renderer`] and [`PlotCollector`] traits.

pub mod config;
pub mod frame;
pub mod pacing;
pub mod runner;
pub mod scene;
pub mod sink;

pub use config::TrialConfig;
pub use frame::{FrameUpdate, ObjectId, ObjectUpdate, Tint, TrialPhase};
pub use pacing::{FramePacer, NoPacing, Pacer};
pub use runner::{BatchProgress, BatchReport, SkippedTrial, TrialResult, TrialRunner};
pub use sink::{FrameRecorder, NullRenderer, PlotCollector, Renderer, ScatterPlot, TrialSample};
