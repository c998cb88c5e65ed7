use std::time::Duration;

/// The source table, resolved against the working directory.
pub const DATA_FILE: &str = "jobs_in_data.csv";

// ---------------------------------------------------------------------------
// Dashboard defaults
// ---------------------------------------------------------------------------

/// Fixed presentation settings. There are no flags or environment
/// overrides; change the defaults here.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub side_panel_width: f32,
    /// Height of each chart panel in points.
    pub chart_height: f32,
    /// Time each animation frame stays on screen while playing.
    pub frame_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "Data Jobs: Salary Dashboard".to_string(),
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
            side_panel_width: 240.0,
            chart_height: 380.0,
            frame_interval: Duration::from_millis(900),
        }
    }
}
