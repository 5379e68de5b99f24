use std::path::PathBuf;

use anyhow::Result;
use compton::draw::{RerunPlot, RerunRenderer, start_session};
use compton::{RerunConfig, TrialConfig, TrialRunner};

/// Environment variable naming an optional JSON trial configuration.
const CONFIG_ENV: &str = "COMPTON_CONFIG";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Without a file, play back at the animation rate
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => TrialConfig::from_json_file(&PathBuf::from(path))?,
        None => TrialConfig {
            realtime: true,
            ..TrialConfig::new()
        },
    };

    let electron_radius = config.electron_radius;
    let mut runner = TrialRunner::from_config(config)?;

    let session = start_session(&RerunConfig::new())?;
    let mut renderer = RerunRenderer::new(session.clone(), RerunConfig::new(), electron_radius);
    let mut plot = RerunPlot::new(session, RerunConfig::new());
    plot.draw_theory(runner.model())?;

    let report = runner.run_batch_with_progress(&mut renderer, &mut plot, |p| {
        if let Some(sample) = p.last {
            log::info!(
                "Trial {}/{}: theta = {:.4} pi rad, shift = {:.4e} m",
                p.trials_done,
                p.trial_count,
                sample.angle / std::f64::consts::PI,
                sample.shift
            );
        }
    })?;

    println!(
        "{} trials completed, {} skipped",
        report.completed(),
        report.skipped.len()
    );
    Ok(())
}
