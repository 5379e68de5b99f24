use std::f64::consts::PI;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::physics::{ComptonModel, Electron, Photon, ScatterError, ScatterOutcome};
use crate::sim::config::TrialConfig;
use crate::sim::frame::{FrameUpdate, TrialPhase};
use crate::sim::pacing::{FramePacer, NoPacing, Pacer};
use crate::sim::scene::{ElectronBall, PhotonWave};
use crate::sim::sink::{PlotCollector, Renderer, TrialSample};

/// Everything one completed trial produced.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub sample: TrialSample,
    pub outcome: ScatterOutcome,
    /// Ticks spent in the approach phase.
    pub approach_ticks: usize,
    /// Angles thrown away because the recoil was degenerate.
    pub resamples: usize,
}

/// A trial that ended without a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedTrial {
    pub trial: usize,
    pub error: ScatterError,
}

/// Summary of a batch of trials.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub samples: Vec<TrialSample>,
    pub skipped: Vec<SkippedTrial>,
    /// Ticks emitted over the whole batch.
    pub ticks: u64,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.samples.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    /// Number of finished trials, completed or skipped.
    pub trials_done: usize,
    pub trial_count: usize,
    pub skipped: usize,
    /// Sample of the trial that just finished, if it completed.
    pub last: Option<TrialSample>,
}

trait ProgressReporter {
    fn report(&mut self, progress: &BatchProgress);
}

struct NoProgress;
impl ProgressReporter for NoProgress {
    fn report(&mut self, _progress: &BatchProgress) {}
}

struct FnProgress<F> {
    f: F,
}
impl<F> ProgressReporter for FnProgress<F>
where
    F: FnMut(&BatchProgress),
{
    fn report(&mut self, progress: &BatchProgress) {
        (self.f)(progress);
    }
}

/// Tick-stepped driver of scattering trials.
///
/// Each trial goes through reset, approach, collide and recede. The scene is
/// rebuilt from scratch at every reset, so trials never see each other's
/// particle state; only the plot collector accumulates.
pub struct TrialRunner<R: Rng> {
    config: TrialConfig,
    model: ComptonModel,
    rng: R,
    pacer: Box<dyn Pacer>,
    tick: u64,
}

impl TrialRunner<StdRng> {
    /// Runner with a `StdRng` seeded from `config.seed`, or from entropy.
    pub fn from_config(config: TrialConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> TrialRunner<R> {
    pub fn new(config: TrialConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let pacer: Box<dyn Pacer> = if config.realtime {
            Box::new(FramePacer::new(config.animation_run_rate))
        } else {
            Box::new(NoPacing)
        };
        Ok(Self {
            model: ComptonModel::new(config.constants),
            config,
            rng,
            pacer,
            tick: 0,
        })
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn model(&self) -> &ComptonModel {
        &self.model
    }

    /// Draws a scattering angle uniformly from (-pi, pi].
    pub fn sample_angle(&mut self) -> f64 {
        // gen() is in [0, 1), which maps onto (-pi, pi]
        PI - 2. * PI * self.rng.r#gen::<f64>()
    }

    /// Runs `trial_count` trials.
    ///
    /// Trials failing with a [`ScatterError`] are logged and skipped. Errors
    /// from the renderer or the plot collector stop the batch.
    pub fn run_batch<V, P>(&mut self, renderer: &mut V, plot: &mut P) -> Result<BatchReport>
    where
        V: Renderer,
        P: PlotCollector,
    {
        self.run_batch_inner(renderer, plot, NoProgress)
    }

    /// Runs the batch and reports progress after every trial.
    pub fn run_batch_with_progress<V, P, F>(
        &mut self,
        renderer: &mut V,
        plot: &mut P,
        report: F,
    ) -> Result<BatchReport>
    where
        V: Renderer,
        P: PlotCollector,
        F: FnMut(&BatchProgress),
    {
        self.run_batch_inner(renderer, plot, FnProgress { f: report })
    }

    fn run_batch_inner<V, P, Q>(
        &mut self,
        renderer: &mut V,
        plot: &mut P,
        mut reporter: Q,
    ) -> Result<BatchReport>
    where
        V: Renderer,
        P: PlotCollector,
        Q: ProgressReporter,
    {
        let trial_count = self.config.trial_count;
        let start_tick = self.tick;
        let mut report = BatchReport::default();
        log::info!(
            "Running {} trials, lambda_0 = {:e} m",
            trial_count,
            self.config.initial_wavelength
        );

        for trial in 0..trial_count {
            let mut last = None;
            match self.run_trial(trial, renderer, plot) {
                Ok(result) => {
                    last = Some(result.sample);
                    report.samples.push(result.sample);
                }
                Err(err) => match err.downcast_ref::<ScatterError>() {
                    Some(&error) => {
                        log::warn!("Skipping trial {trial}: {error}");
                        report.skipped.push(SkippedTrial { trial, error });
                    }
                    None => return Err(err),
                },
            }
            reporter.report(&BatchProgress {
                trials_done: trial + 1,
                trial_count,
                skipped: report.skipped.len(),
                last,
            });
        }

        report.ticks = self.tick - start_tick;
        log::info!(
            "Finished {} trials ({} skipped) in {} ticks",
            report.completed(),
            report.skipped.len(),
            report.ticks
        );
        Ok(report)
    }

    /// Runs one trial from reset to done.
    ///
    /// Emits a frame per tick to `renderer` and, on success, one sample to
    /// `plot`. Physics failures come back as a [`ScatterError`] inside the
    /// `anyhow::Error`.
    pub fn run_trial<V, P>(
        &mut self,
        trial: usize,
        renderer: &mut V,
        plot: &mut P,
    ) -> Result<TrialResult>
    where
        V: Renderer,
        P: PlotCollector,
    {
        let cfg = self.config.clone();
        let step = cfg.photon_step();

        // Reset
        let incident = self.model.incident(cfg.initial_wavelength)?;
        let rest = Electron::at_rest(self.model.constants());
        let mut wave = PhotonWave::new(&cfg, incident.frequency);
        let mut ball = ElectronBall::new(&cfg);
        self.emit(renderer, trial, TrialPhase::Reset, &wave, &ball, &incident, &rest)?;

        // Approach
        let mut approach_ticks = 0;
        while wave.leading_x() < ball.position().x {
            if approach_ticks >= cfg.max_approach_ticks {
                anyhow::bail!(
                    "Photon did not reach the electron within {} ticks",
                    cfg.max_approach_ticks
                );
            }
            self.pacer.wait();
            wave.advance(step);
            approach_ticks += 1;
            self.emit(renderer, trial, TrialPhase::Approach, &wave, &ball, &incident, &rest)?;
        }

        // Collide
        let (outcome, resamples) = self.collide(trial)?;
        wave.deflect(
            outcome.angle,
            outcome.photon.frequency,
            cfg.scalefactor_length,
        );
        log::debug!(
            "Trial {trial}: theta = {:.4} rad, shift = {:.4e} m, v = {:.4e} m/s, residuals p = {:.1e} E = {:.1e}",
            outcome.angle,
            outcome.shift,
            outcome.electron.speed,
            outcome.momentum_residual(),
            outcome.energy_residual()
        );
        self.emit(
            renderer,
            trial,
            TrialPhase::Collide,
            &wave,
            &ball,
            &outcome.photon,
            &outcome.electron,
        )?;

        // Recede
        let electron_step = outcome.electron.velocity * (cfg.dt / cfg.scalefactor_time);
        for _ in 0..cfg.post_collision_ticks {
            self.pacer.wait();
            wave.advance(step);
            ball.advance(electron_step);
            self.emit(
                renderer,
                trial,
                TrialPhase::Recede,
                &wave,
                &ball,
                &outcome.photon,
                &outcome.electron,
            )?;
        }

        // Done
        let sample = TrialSample {
            trial,
            angle: outcome.angle,
            shift: outcome.shift,
            wavelength: outcome.photon.wavelength,
            recoil_speed: outcome.electron.speed,
            recoil_angle: outcome.electron.recoil_angle.unwrap_or(0.),
        };
        plot.record(&sample)?;
        self.emit(
            renderer,
            trial,
            TrialPhase::Done,
            &wave,
            &ball,
            &outcome.photon,
            &outcome.electron,
        )?;

        Ok(TrialResult {
            sample,
            outcome,
            approach_ticks,
            resamples,
        })
    }

    /// Samples an angle and scatters, drawing again on a degenerate recoil.
    fn collide(&mut self, trial: usize) -> Result<(ScatterOutcome, usize), ScatterError> {
        let mut resamples = 0;
        loop {
            let angle = self.sample_angle();
            match self.model.scatter(self.config.initial_wavelength, angle) {
                Err(ScatterError::DegenerateRecoil { .. })
                    if resamples < self.config.max_resamples =>
                {
                    log::warn!("Trial {trial}: degenerate recoil at {angle} rad, resampling");
                    resamples += 1;
                }
                other => return other.map(|outcome| (outcome, resamples)),
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit<V: Renderer>(
        &mut self,
        renderer: &mut V,
        trial: usize,
        phase: TrialPhase,
        wave: &PhotonWave,
        ball: &ElectronBall,
        photon: &Photon,
        electron: &Electron,
    ) -> Result<()> {
        let frame = FrameUpdate {
            trial,
            tick: self.tick,
            phase,
            photon: wave.update(photon.label()),
            electron: ball.update(electron.label()),
        };
        self.tick += 1;
        renderer.update(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::frame::Tint;
    use crate::sim::sink::{FrameRecorder, NullRenderer, ScatterPlot};

    fn runner(seed: u64) -> TrialRunner<StdRng> {
        let mut config = TrialConfig::new();
        config.seed = Some(seed);
        TrialRunner::from_config(config).unwrap()
    }

    /// Generator that always returns zero: gen::<f64>() == 0 maps to theta = pi.
    struct ZeroRng;
    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    /// Generator whose first draws map to theta = 0, then to theta = pi.
    struct HalfThenZeroRng {
        halves: usize,
    }
    impl rand::RngCore for HalfThenZeroRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }
        fn next_u64(&mut self) -> u64 {
            if self.halves > 0 {
                self.halves -= 1;
                // Top 53 bits give 0.5 exactly
                1 << 63
            } else {
                0
            }
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_sample_angle_range() {
        let mut r = runner(7);
        for _ in 0..10_000 {
            let theta = r.sample_angle();
            assert!(theta > -PI && theta <= PI);
        }
    }

    #[test]
    fn test_sample_angle_zero_draw_is_pi() {
        let mut r = TrialRunner::new(TrialConfig::new(), ZeroRng).unwrap();
        assert_eq!(r.sample_angle(), PI);
    }

    #[test]
    fn test_trial_phases_in_order() {
        let mut r = runner(1);
        let mut rec = FrameRecorder::new();
        let mut plot = ScatterPlot::new();
        let result = r.run_trial(0, &mut rec, &mut plot).unwrap();

        let frames = rec.frames();
        // 181 units at 0.75 per tick
        assert_eq!(result.approach_ticks, 242);
        assert_eq!(frames.len(), 1 + 242 + 1 + 300 + 1);
        assert_eq!(frames[0].phase, TrialPhase::Reset);
        assert!(frames[1..243].iter().all(|f| f.phase == TrialPhase::Approach));
        assert_eq!(frames[243].phase, TrialPhase::Collide);
        assert!(frames[244..544].iter().all(|f| f.phase == TrialPhase::Recede));
        assert_eq!(frames[544].phase, TrialPhase::Done);
        for (i, f) in frames.iter().enumerate() {
            assert_eq!(f.tick, i as u64);
        }
        assert_eq!(plot.len(), 1);
        assert_eq!(plot.samples()[0], result.sample);
    }

    #[test]
    fn test_photon_reaches_electron_then_turns_red() {
        let mut r = runner(2);
        let mut rec = FrameRecorder::new();
        let mut plot = ScatterPlot::new();
        r.run_trial(0, &mut rec, &mut plot).unwrap();
        let frames = rec.frames();

        let last_approach = &frames[242];
        assert!(last_approach.photon.position.x >= 0.);
        assert!(frames[241].photon.position.x < 0.);
        assert!(frames[..243].iter().all(|f| f.photon.tint == Tint::Initial));
        assert!(frames[243..].iter().all(|f| f.photon.tint == Tint::Scattered));
        // Electron stays put until the collision
        assert!(
            frames[..244]
                .iter()
                .all(|f| f.electron.position.is_close(&crate::Point::origin()))
        );
    }

    #[test]
    fn test_recede_moves_along_directions() {
        let mut r = TrialRunner::new(TrialConfig::new(), ZeroRng).unwrap();
        let mut rec = FrameRecorder::new();
        let mut plot = ScatterPlot::new();
        let result = r.run_trial(0, &mut rec, &mut plot).unwrap();
        assert_eq!(result.sample.angle, PI);

        let frames = rec.frames();
        let first = &frames[244];
        let last = frames.last().unwrap();
        // Backscattered photon heads to -X, electron recoils to +X
        assert!(last.photon.position.x < first.photon.position.x);
        assert!(last.electron.position.x > first.electron.position.x);
        let v = result.outcome.electron.speed;
        let expected = v * 0.05 / 2e7 * 300.;
        assert!((last.electron.position.x - expected).abs() / expected < 1e-6);
    }

    #[test]
    fn test_labels_follow_physics() {
        let mut r = TrialRunner::new(TrialConfig::new(), ZeroRng).unwrap();
        let mut rec = FrameRecorder::new();
        let mut plot = ScatterPlot::new();
        r.run_trial(0, &mut rec, &mut plot).unwrap();
        let frames = rec.frames();
        assert!(frames[0].photon.label.contains("λ = 1.0000e-12 meters"));
        assert!(frames[0].electron.label.starts_with("Electron\nv = 0.0000e0"));
        assert!(frames[243].photon.label.contains("λ = 5.8526e-12 meters"));
        assert!(frames[243].photon.label.contains("∡ = 1.0000 π radians"));
        assert!(frames[243].electron.label.contains("∡ = "));
    }

    #[test]
    fn test_degenerate_recoil_resampled() {
        let mut config = TrialConfig::new();
        config.max_resamples = 3;
        let rng = HalfThenZeroRng { halves: 2 };
        let mut r = TrialRunner::new(config, rng).unwrap();
        let mut plot = ScatterPlot::new();
        let result = r.run_trial(0, &mut NullRenderer, &mut plot).unwrap();
        assert_eq!(result.resamples, 2);
        assert_eq!(result.sample.angle, PI);
    }

    #[test]
    fn test_degenerate_recoil_skips_trial() {
        let mut config = TrialConfig::new();
        config.max_resamples = 1;
        config.trial_count = 2;
        let rng = HalfThenZeroRng { halves: 2 };
        let mut r = TrialRunner::new(config, rng).unwrap();
        let mut plot = ScatterPlot::new();
        let report = r.run_batch(&mut NullRenderer, &mut plot).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].trial, 0);
        assert_eq!(
            report.skipped[0].error,
            ScatterError::DegenerateRecoil { angle: 0. }
        );
        assert_eq!(report.completed(), 1);
        assert_eq!(plot.samples()[0].trial, 1);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = TrialConfig::new();
        config.initial_wavelength = -1e-12;
        assert!(TrialRunner::new(config, ZeroRng).is_err());
    }

    #[test]
    fn test_electron_behind_photon_needs_no_approach() {
        let mut config = TrialConfig::new();
        config.electron_position = crate::Point::new(-190., 0., 0.);
        let mut r = TrialRunner::new(config, ZeroRng).unwrap();
        let result = r.run_trial(0, &mut NullRenderer, &mut ScatterPlot::new()).unwrap();
        assert_eq!(result.approach_ticks, 0);
    }

    #[test]
    fn test_approach_guard() {
        let mut config = TrialConfig::new();
        config.max_approach_ticks = 10;
        let mut r = TrialRunner::new(config, ZeroRng).unwrap();
        let err = r
            .run_trial(0, &mut NullRenderer, &mut ScatterPlot::new())
            .unwrap_err();
        assert!(err.downcast_ref::<ScatterError>().is_none());
        assert!(err.to_string().contains("did not reach"));
    }

    #[test]
    fn test_renderer_error_stops_batch() {
        struct Failing;
        impl Renderer for Failing {
            fn update(&mut self, frame: &FrameUpdate) -> Result<()> {
                if frame.tick == 10 {
                    anyhow::bail!("display closed");
                }
                Ok(())
            }
        }
        let mut r = runner(3);
        let mut plot = ScatterPlot::new();
        assert!(r.run_batch(&mut Failing, &mut plot).is_err());
        assert!(plot.is_empty());
    }

    #[test]
    fn test_progress_reported_each_trial() {
        let mut config = TrialConfig::new();
        config.trial_count = 4;
        config.seed = Some(11);
        let mut r = TrialRunner::from_config(config).unwrap();
        let mut seen = Vec::new();
        let report = r
            .run_batch_with_progress(&mut NullRenderer, &mut ScatterPlot::new(), |p| {
                seen.push((p.trials_done, p.trial_count, p.last.is_some()))
            })
            .unwrap();
        assert_eq!(seen, vec![(1, 4, true), (2, 4, true), (3, 4, true), (4, 4, true)]);
        assert_eq!(report.ticks, 4 * 545);
    }

    #[test]
    fn test_same_seed_same_batch() {
        let mut config = TrialConfig::new();
        config.trial_count = 5;
        config.seed = Some(99);
        let mut a = TrialRunner::from_config(config.clone()).unwrap();
        let mut b = TrialRunner::from_config(config).unwrap();
        let ra = a.run_batch(&mut NullRenderer, &mut ScatterPlot::new()).unwrap();
        let rb = b.run_batch(&mut NullRenderer, &mut ScatterPlot::new()).unwrap();
        assert_eq!(ra.samples, rb.samples);
    }
}
