use eframe::egui::{RichText, Ui};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::Theme;
use crate::data::sample::RoomSample;
use crate::model::ModelError;
use crate::predict::ImportanceBar;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Feature importance (horizontal bars)
// ---------------------------------------------------------------------------

pub fn importance_chart(
    ui: &mut Ui,
    importances: &Result<Vec<ImportanceBar>, ModelError>,
    theme: &Theme,
) {
    ui.heading("📌 Feature Importance");

    let bars = match importances {
        Ok(bars) => bars,
        Err(e) => {
            ui.label(RichText::new(format!("Error: {e}")).color(theme.error_text));
            return;
        }
    };

    let names: Vec<String> = bars.iter().map(|b| b.name.clone()).collect();
    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new(i as f64, bar.importance)
                    .name(&bar.name)
                    .fill(theme.importance_bar)
            })
            .collect(),
    )
    .horizontal()
    .color(theme.importance_bar)
    .name("Importance");

    Plot::new("feature_importance")
        .height(CHART_HEIGHT)
        .x_axis_label("Importance")
        .y_axis_formatter(move |mark, _range| axis_label(&names, mark.value))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// Category label for an axis tick; blank between categories.
fn axis_label(names: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Room count histogram
// ---------------------------------------------------------------------------

pub fn room_histogram(ui: &mut Ui, sample: Option<&RoomSample>, theme: &Theme) {
    ui.heading("🏘 Room Count Distribution");
    ui.label("Distribution of Average Rooms");

    let Some(sample) = sample else {
        ui.label("No sample drawn.");
        return;
    };

    let chart = BarChart::new(
        sample
            .bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width())
                    .fill(theme.histogram_bar)
            })
            .collect(),
    )
    .color(theme.histogram_bar)
    .name("Count");

    let kde: PlotPoints = sample.kde.iter().copied().collect();
    let line = Line::new(kde).color(theme.kde_line).width(2.0).name("Density");

    Plot::new("room_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Number of Rooms")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.line(line);
        });
}
