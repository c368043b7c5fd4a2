use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::color::Theme;
use crate::model::RegressionModel;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousingDashboardApp {
    pub state: AppState,
    /// Loaded once at start-up and never mutated.
    model: Arc<dyn RegressionModel>,
    theme: Theme,
}

impl HousingDashboardApp {
    pub fn new(model: Arc<dyn RegressionModel>, state: AppState) -> Self {
        Self {
            state,
            model,
            theme: Theme::default(),
        }
    }
}

impl eframe::App for HousingDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        // ---- Top panel: title ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui, &self.theme, self.state.status_message.as_deref());
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui, &self.theme);
        });

        // ---- Central panel: form, prediction, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("🧾 Enter Housing Features");
                    events.extend(panels::input_form(ui, &mut self.state.inputs));
                    panels::assembled_table(ui, &self.state.inputs);
                    ui.separator();

                    events.extend(panels::prediction_panel(
                        ui,
                        &self.state.prediction,
                        &self.theme,
                    ));
                    ui.separator();

                    ui.heading("📊 Dashboard Insights");
                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::importance_chart(&mut cols[0], &self.state.importances, &self.theme);
                        plot::room_histogram(
                            &mut cols[1],
                            self.state.room_sample.as_ref(),
                            &self.theme,
                        );
                    });
                });
        });

        for event in events {
            self.state.handle(event, self.model.as_ref());
        }
    }
}
