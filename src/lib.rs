pub mod draw;
pub mod geom;
pub mod physics;
pub mod sim;

// Prelude
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use physics::{ComptonModel, PhysicalConstants, ScatterError, ScatterOutcome};
pub use sim::{TrialConfig, TrialRunner};
// Drawing utility
pub use draw::RerunConfig;
