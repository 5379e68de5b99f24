use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialPhase {
    /// Particles back at their initial conditions.
    Reset,
    /// Photon travelling toward the electron.
    Approach,
    /// Angle sampled and the scattering applied.
    Collide,
    /// Both particles moving apart.
    Recede,
    /// Sample emitted, trial over.
    Done,
}

impl TrialPhase {
    pub fn name(&self) -> &'static str {
        match self {
            TrialPhase::Reset => "reset",
            TrialPhase::Approach => "approach",
            TrialPhase::Collide => "collide",
            TrialPhase::Recede => "recede",
            TrialPhase::Done => "done",
        }
    }
}

/// Scene objects a renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectId {
    Photon,
    Electron,
}

impl ObjectId {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectId::Photon => "photon",
            ObjectId::Electron => "electron",
        }
    }
}

/// Color state of an object; the photon turns from initial to scattered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Initial,
    Scattered,
}

/// Draw state of one object at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectUpdate {
    pub id: ObjectId,
    /// Photon: leading edge of the wave. Electron: sphere center.
    pub position: Point,
    /// Polyline in scene coordinates (empty for the electron).
    pub shape: Vec<Point>,
    pub tint: Tint,
    pub label: String,
}

/// Everything a renderer needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    /// Zero-based trial index within the batch.
    pub trial: usize,
    /// Monotonic tick counter across the whole batch.
    pub tick: u64,
    pub phase: TrialPhase,
    pub photon: ObjectUpdate,
    pub electron: ObjectUpdate,
}

impl FrameUpdate {
    pub fn objects(&self) -> [&ObjectUpdate; 2] {
        [&self.photon, &self.electron]
    }
}
