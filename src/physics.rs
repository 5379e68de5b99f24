//! Closed-form Compton scattering physics.
//!
//! Everything here is pure: the same inputs always give the same outputs and
//! no function draws random numbers. Angle sampling lives in [`crate::sim`].

pub mod constants;
pub mod error;
pub mod particles;
pub mod scatter;

pub use constants::PhysicalConstants;
pub use error::ScatterError;
pub use particles::{Electron, Photon};
pub use scatter::{ComptonModel, ScatterOutcome};
