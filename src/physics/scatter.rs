use serde::{Deserialize, Serialize};

use crate::physics::constants::PhysicalConstants;
use crate::physics::error::ScatterError;
use crate::physics::particles::{Electron, Photon};

/// Result of one photon-electron collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterOutcome {
    /// Scattering angle (rad)
    pub angle: f64,
    /// Wavelength shift lambda_out - lambda_in (m)
    pub shift: f64,
    /// Photon before the collision, travelling along +X
    pub incident: Photon,
    /// Electron before the collision (at rest)
    pub target: Electron,
    /// Scattered photon
    pub photon: Photon,
    /// Recoiling electron
    pub electron: Electron,
}

impl ScatterOutcome {
    /// Relative momentum imbalance |p_before - p_after| / |p_before|.
    pub fn momentum_residual(&self) -> f64 {
        let before = self.incident.momentum + self.target.momentum;
        let after = self.photon.momentum + self.electron.momentum;
        (before - after).length() / before.length()
    }

    /// Relative energy imbalance |E_before - E_after| / E_before.
    pub fn energy_residual(&self) -> f64 {
        let before = self.incident.energy + self.target.energy;
        let after = self.photon.energy + self.electron.energy;
        (before - after).abs() / before
    }
}

/// Compton scattering off a free electron initially at rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComptonModel {
    constants: PhysicalConstants,
}

impl ComptonModel {
    pub fn new(constants: PhysicalConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Compton shift formula: lambda_C (1 - cos theta).
    pub fn compton_shift(&self, angle: f64) -> f64 {
        self.constants.compton_wavelength * (1. - angle.cos())
    }

    /// Photon of the given wavelength travelling along +X toward the electron.
    pub fn incident(&self, wavelength: f64) -> Result<Photon, ScatterError> {
        Photon::new(wavelength, 0., &self.constants)
    }

    /// Scatters a photon of wavelength `wavelength` by `angle`.
    ///
    /// The scattered photon follows from the Compton shift; the electron
    /// takes whatever momentum and energy the photon gave up.
    ///
    /// Fails with `InvalidWavelength` for a non-positive or non-finite
    /// wavelength, and with `DegenerateRecoil` when the electron is left
    /// without momentum (forward scattering at exactly zero angle), because
    /// its direction of motion is then undefined.
    pub fn scatter(&self, wavelength: f64, angle: f64) -> Result<ScatterOutcome, ScatterError> {
        let k = &self.constants;
        let incident = self.incident(wavelength)?;
        let target = Electron::at_rest(k);

        let shift = self.compton_shift(angle);
        let photon = Photon::new(wavelength + shift, angle, k)?;

        // Conservation of momentum
        let momentum = (incident.momentum + target.momentum) - photon.momentum;
        if !momentum.length().is_finite() {
            return Err(ScatterError::InvalidWavelength { wavelength });
        }
        if momentum.length() <= f64::EPSILON * incident.momentum.length() {
            return Err(ScatterError::DegenerateRecoil { angle });
        }

        // Conservation of energy
        let energy = (incident.energy - photon.energy) + target.rest_energy;
        let mass = energy / k.speed_of_light.powi(2);
        let velocity = (momentum / mass).ok_or(ScatterError::DegenerateRecoil { angle })?;
        let recoil_angle = velocity
            .angle_xy()
            .ok_or(ScatterError::DegenerateRecoil { angle })?;

        let electron = Electron {
            rest_mass: target.rest_mass,
            rest_energy: target.rest_energy,
            momentum,
            energy,
            mass,
            velocity,
            speed: velocity.length(),
            recoil_angle: Some(recoil_angle),
        };

        Ok(ScatterOutcome {
            angle,
            shift,
            incident,
            target,
            photon,
            electron,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const LAMBDA_0: f64 = 1e-12;

    fn model() -> ComptonModel {
        ComptonModel::new(PhysicalConstants::new())
    }

    fn angles(n: usize) -> Vec<f64> {
        // Evenly spread over (-pi, pi], skipping the degenerate zero angle
        (0..n)
            .map(|i| PI - 2. * PI * (i as f64 + 0.5) / n as f64)
            .collect()
    }

    #[test]
    fn test_shift_forward_is_zero() {
        assert_eq!(model().compton_shift(0.), 0.);
    }

    #[test]
    fn test_shift_backscatter_is_maximal() {
        let m = model();
        let lc = m.constants().compton_wavelength;
        assert!((m.compton_shift(PI) - 2. * lc).abs() < 1e-27);
        assert!((m.compton_shift(-PI) - 2. * lc).abs() < 1e-27);
    }

    #[test]
    fn test_shift_monotonic_on_zero_to_pi() {
        let m = model();
        let mut prev = m.compton_shift(0.);
        for i in 1..=1000 {
            let theta = PI * i as f64 / 1000.;
            let s = m.compton_shift(theta);
            assert!(s >= prev, "shift decreased at theta={}", theta);
            prev = s;
        }
    }

    #[test]
    fn test_conservation() {
        let m = model();
        for theta in angles(360) {
            let out = m.scatter(LAMBDA_0, theta).unwrap();
            assert!(out.momentum_residual() < 1e-6, "momentum at {}", theta);
            assert!(out.energy_residual() < 1e-6, "energy at {}", theta);
        }
    }

    #[test]
    fn test_right_angle_scenario() {
        let m = model();
        let out = m.scatter(LAMBDA_0, PI / 2.).unwrap();
        assert!((out.shift - 2.4263102389e-12).abs() < 1e-24);
        assert!((out.photon.wavelength - 3.4263102389e-12).abs() < 1e-24);
        let c = m.constants().speed_of_light;
        assert!(out.electron.speed > 0.);
        assert!(out.electron.speed < c);
        assert!(out.electron.gamma() > 1.);
    }

    #[test]
    fn test_recoil_goes_to_opposite_side() {
        // Photon deflected upward pushes the electron forward and downward
        let m = model();
        let up = m.scatter(LAMBDA_0, PI / 3.).unwrap();
        let recoil = up.electron.recoil_angle.unwrap();
        assert!(recoil < 0. && recoil > -PI / 2.);

        let down = m.scatter(LAMBDA_0, -PI / 3.).unwrap();
        let recoil = down.electron.recoil_angle.unwrap();
        assert!(recoil > 0. && recoil < PI / 2.);
    }

    #[test]
    fn test_backscatter_recoil_straight_ahead() {
        let m = model();
        let out = m.scatter(LAMBDA_0, PI).unwrap();
        let recoil = out.electron.recoil_angle.unwrap();
        assert!(recoil.abs() < 1e-9);
        assert!(out.electron.velocity.dx > 0.);
    }

    #[test]
    fn test_speed_below_light_for_all_angles() {
        let m = model();
        let c = m.constants().speed_of_light;
        for theta in angles(100) {
            let out = m.scatter(LAMBDA_0, theta).unwrap();
            assert!(out.electron.speed > 0. && out.electron.speed < c);
            assert!(out.electron.energy > out.electron.rest_energy);
        }
    }

    #[test]
    fn test_idempotent() {
        let m = model();
        let a = m.scatter(LAMBDA_0, 1.2345).unwrap();
        let b = m.scatter(LAMBDA_0, 1.2345).unwrap();
        assert_eq!(a.shift.to_bits(), b.shift.to_bits());
        assert_eq!(a.photon.wavelength.to_bits(), b.photon.wavelength.to_bits());
        assert_eq!(a.electron.velocity.dx.to_bits(), b.electron.velocity.dx.to_bits());
        assert_eq!(a.electron.velocity.dy.to_bits(), b.electron.velocity.dy.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_wavelength() {
        let m = model();
        assert_eq!(
            m.scatter(0., 1.),
            Err(ScatterError::InvalidWavelength { wavelength: 0. })
        );
        assert!(matches!(
            m.scatter(-1e-12, 1.),
            Err(ScatterError::InvalidWavelength { .. })
        ));
    }

    #[test]
    fn test_overflowing_wavelength_is_invalid_not_degenerate() {
        let m = model();
        assert_eq!(
            m.scatter(1e-310, 1.),
            Err(ScatterError::InvalidWavelength { wavelength: 1e-310 })
        );
        assert!(matches!(
            m.scatter(1e-290, PI),
            Err(ScatterError::InvalidWavelength { .. })
        ));
    }

    #[test]
    fn test_degenerate_recoil_at_zero_angle() {
        let m = model();
        assert_eq!(
            m.scatter(LAMBDA_0, 0.),
            Err(ScatterError::DegenerateRecoil { angle: 0. })
        );
    }

    #[test]
    fn test_tiny_angle_still_defined() {
        let m = model();
        let out = m.scatter(LAMBDA_0, 1e-6).unwrap();
        assert!(out.electron.speed > 0.);
        assert!(out.electron.recoil_angle.is_some());
    }

    #[test]
    fn test_angles_beyond_pi_accepted() {
        let m = model();
        let a = m.scatter(LAMBDA_0, 0.7).unwrap();
        let b = m.scatter(LAMBDA_0, 0.7 + 2. * PI).unwrap();
        assert!((a.shift - b.shift).abs() < 1e-24);
    }
}
