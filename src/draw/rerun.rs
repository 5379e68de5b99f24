use std::f64::consts::PI;

use anyhow::Result;
use rerun as rr;

use crate::Point;
use crate::draw::config::{RerunConfig, Rgba};
use crate::physics::ComptonModel;
use crate::sim::{FrameUpdate, PlotCollector, Renderer, Tint, TrialSample};

/// Ratio between meters and the picometers shown on the plot's Y axis.
const PICOMETERS: f64 = 1e12;

/// Converts Point to native format of Rerun
impl From<Point> for rr::Vec3D {
    fn from(val: Point) -> Self {
        rr::Vec3D([val.x as f32, val.y as f32, val.z as f32])
    }
}

fn color(rgba: Rgba) -> rr::Color {
    let (r, g, b, a) = rgba;
    rr::Color(rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a))
}

fn plot_point(angle: f64, shift: f64) -> rr::Vec2D {
    rr::Vec2D([angle as f32, (shift * PICOMETERS) as f32])
}

pub fn start_session(config: &RerunConfig) -> Result<rr::RecordingStream> {
    // Spawns a viewer and connects to it on the default address and port
    let session = rr::RecordingStreamBuilder::new(config.session_name.as_str()).spawn()?;

    Ok(session)
}

/// Draws the photon wave and the electron every tick.
pub struct RerunRenderer {
    session: rr::RecordingStream,
    config: RerunConfig,
    electron_radius: f32,
}

impl RerunRenderer {
    pub fn new(session: rr::RecordingStream, config: RerunConfig, electron_radius: f64) -> Self {
        Self {
            session,
            config,
            electron_radius: electron_radius as f32,
        }
    }

    fn entity(&self, name: &str) -> String {
        format!("{}/scene/{}", self.config.entity_prefix, name)
    }
}

impl Renderer for RerunRenderer {
    fn update(&mut self, frame: &FrameUpdate) -> Result<()> {
        let cfg = &self.config;
        self.session.set_time_sequence(cfg.tick_timeline.as_str(), frame.tick as i64);

        let photon = &frame.photon;
        let photon_color = match photon.tint {
            Tint::Initial => cfg.photon_color_initial,
            Tint::Scattered => cfg.photon_color_scattered,
        };
        let strip: Vec<rr::Vec3D> = photon.shape.iter().copied().map(rr::Vec3D::from).collect();
        self.session.log(
            self.entity(photon.id.name()),
            &rr::LineStrips3D::new(vec![strip])
                .with_radii([cfg.photon_radius])
                .with_colors([color(photon_color)]),
        )?;

        let electron = &frame.electron;
        self.session.log(
            self.entity(electron.id.name()),
            &rr::Points3D::new([rr::Vec3D::from(electron.position)])
                .with_radii([self.electron_radius])
                .with_colors([color(cfg.electron_color)]),
        )?;

        let (px, py, pz) = cfg.photon_label_pos;
        let (ex, ey, ez) = cfg.electron_label_pos;
        self.session.log(
            self.entity("labels"),
            &rr::Points3D::new([rr::Vec3D([px, py, pz]), rr::Vec3D([ex, ey, ez])])
                .with_radii([0.0_f32, 0.0])
                .with_labels([photon.label.as_str(), electron.label.as_str()]),
        )?;

        self.session.log(
            self.entity("phase"),
            &rr::TextDocument::new(format!("Trial {}: {}", frame.trial + 1, frame.phase.name())),
        )?;

        Ok(())
    }
}

/// Accumulates the shift vs. angle scatter plot in the viewer.
///
/// Every recorded sample re-logs the full point cloud, so the plot always
/// shows all trials so far.
pub struct RerunPlot {
    session: rr::RecordingStream,
    config: RerunConfig,
    points: Vec<rr::Vec2D>,
}

impl RerunPlot {
    pub fn new(session: rr::RecordingStream, config: RerunConfig) -> Self {
        Self {
            session,
            config,
            points: Vec::new(),
        }
    }

    fn entity(&self, name: &str) -> String {
        format!("{}/plot/{}", self.config.entity_prefix, name)
    }

    /// Logs the title, the Compton curve and the axis frame once.
    pub fn draw_theory(&self, model: &ComptonModel) -> Result<()> {
        let n = self.config.plot_theory_samples.max(2);
        let curve: Vec<rr::Vec2D> = (0..n)
            .map(|i| {
                let angle = -PI + 2. * PI * i as f64 / (n - 1) as f64;
                plot_point(angle, model.compton_shift(angle))
            })
            .collect();
        self.session.log_static(
            self.entity("theory"),
            &rr::LineStrips2D::new(vec![curve])
                .with_colors([color(self.config.plot_theory_color)])
                .with_labels(["λ_C (1 - cos θ)"]),
        )?;

        // Plot range: angle in [-pi, pi], shift in [0, 6] pm
        let frame = vec![
            plot_point(-PI, 0.),
            plot_point(PI, 0.),
            plot_point(PI, 6e-12),
            plot_point(-PI, 6e-12),
            plot_point(-PI, 0.),
        ];
        self.session.log_static(
            self.entity("axes"),
            &rr::LineStrips2D::new(vec![frame]).with_colors([color((0.3, 0.3, 0.3, 0.5))]),
        )?;

        let cfg = &self.config;
        self.session.log_static(
            self.entity("title"),
            &rr::TextDocument::new(format!(
                "{}\n\nX: {}\nY: {}",
                cfg.plot_title, cfg.plot_x_caption, cfg.plot_y_caption
            )),
        )?;

        Ok(())
    }
}

impl PlotCollector for RerunPlot {
    fn record(&mut self, sample: &TrialSample) -> Result<()> {
        self.points.push(plot_point(sample.angle, sample.shift));

        let timeline = self.config.trial_timeline.as_str();
        self.session.set_time_sequence(timeline, sample.trial as i64);
        let logged = self
            .session
            .log(
                self.entity("samples"),
                &rr::Points2D::new(self.points.clone())
                    .with_radii([self.config.plot_point_radius])
                    .with_colors([color(self.config.plot_point_color)]),
            )
            .and_then(|()| {
                self.session.log(
                    self.entity("shift_pm"),
                    &rr::Scalars::new([sample.shift * PICOMETERS]),
                )
            });
        // The stream is shared with the scene, which must not inherit the trial time
        self.session.disable_timeline(timeline);
        logged?;

        Ok(())
    }
}
