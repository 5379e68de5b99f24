use thiserror::Error;

/// Recoverable failures of a single scattering event.
///
/// Both variants abort only the trial that hit them; the batch goes on.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScatterError {
    #[error("Invalid wavelength: {wavelength} m (must be positive and finite)")]
    InvalidWavelength { wavelength: f64 },

    #[error("Degenerate recoil at angle {angle} rad: electron momentum vanished, direction undefined")]
    DegenerateRecoil { angle: f64 },
}
