//! Rerun-backed renderer and plot collector.

pub mod config;
pub mod rerun;

pub use config::RerunConfig;
pub use rerun::{RerunPlot, RerunRenderer, start_session};
