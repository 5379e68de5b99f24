/// RGBA color tuple (red, green, blue, alpha) with values in 0.0..=1.0.
pub type Rgba = (f32, f32, f32, f32);

/// Configuration for Rerun visualization sessions.
///
/// Controls session naming, entity prefixes, and default colors/sizes
/// of the scattering scene and the shift plot.
pub struct RerunConfig {
    // Labels
    pub session_name: String,
    pub entity_prefix: String,
    /// Timeline the scene is logged on.
    pub tick_timeline: String,

    // Scene
    pub photon_color_initial: Rgba,
    pub photon_color_scattered: Rgba,
    pub photon_radius: f32,
    pub electron_color: Rgba,
    /// Label anchors in scene units, as in the 800x600 window of ±200 range.
    pub photon_label_pos: (f32, f32, f32),
    pub electron_label_pos: (f32, f32, f32),

    // Plot
    pub plot_title: String,
    pub plot_x_caption: String,
    pub plot_y_caption: String,
    /// Timeline the plot samples are logged on.
    pub trial_timeline: String,
    pub plot_point_color: Rgba,
    pub plot_point_radius: f32,
    pub plot_theory_color: Rgba,
    /// Samples of the theoretical curve over [-pi, pi].
    pub plot_theory_samples: usize,
}

impl RerunConfig {
    pub fn new() -> Self {
        Self {
            session_name: "compton".to_string(),
            entity_prefix: "Compton".to_string(),
            tick_timeline: "tick".to_string(),

            photon_color_initial: (0.0, 0.0, 1.0, 1.0),
            photon_color_scattered: (1.0, 0.0, 0.0, 1.0),
            photon_radius: 0.5,
            electron_color: (1.0, 1.0, 1.0, 1.0),
            photon_label_pos: (-160.0, 100.0, 0.0),
            electron_label_pos: (30.0, 100.0, 0.0),

            plot_title: "Wavelength Shift as a Function of Scattering Angle".to_string(),
            plot_x_caption: "Scattering angle θ (rad)".to_string(),
            plot_y_caption: "Wavelength shift Δλ (pm)".to_string(),
            trial_timeline: "trial".to_string(),
            plot_point_color: (1.0, 0.0, 0.0, 1.0),
            plot_point_radius: 0.03,
            plot_theory_color: (0.5, 0.5, 0.5, 0.6),
            plot_theory_samples: 181,
        }
    }
}

impl Default for RerunConfig {
    fn default() -> Self {
        Self::new()
    }
}
