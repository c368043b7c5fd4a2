use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use housing_dashboard::app::HousingDashboardApp;
use housing_dashboard::config::{self, DashboardConfig};
use housing_dashboard::model::{self, RegressionModel};
use housing_dashboard::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(Path::new(config::CONFIG_FILE))?;

    // A missing or corrupt artifact ends the session before the window opens.
    let model: Arc<dyn RegressionModel> = model::loader::load_model(&config.model_path)
        .with_context(|| format!("cannot start without model {}", config.model_path.display()))?
        .into();

    let state = AppState::new(model.as_ref(), config.room_sample.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Real Estate Dashboard")
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Real Estate Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(HousingDashboardApp::new(model, state)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with error: {e}"))
}
