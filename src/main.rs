use anyhow::{anyhow, Context, Result};
use eframe::egui;

use jobs_dashboard::config::{DashboardConfig, DATA_FILE};
use jobs_dashboard::data::loader;
use jobs_dashboard::state::AppState;
use jobs_dashboard::DashboardApp;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();
    let relation = match loader::load() {
        Ok(relation) => relation,
        Err(e) => {
            log::error!("Failed to load {DATA_FILE}: {e}");
            return Err(e).with_context(|| format!("loading dataset {DATA_FILE}"));
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    let title = config.window_title.clone();
    let state = AppState::new(relation, config);
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI terminated: {e}"))
}
