use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::Theme;
use crate::data::features::{Feature, FeatureVector, FieldMut, InputKind};
use crate::model::ModelError;
use crate::predict::Prediction;
use crate::state::DashboardEvent;

/// Features shown in the left input column; the rest go right.
const LEFT_COLUMN_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Header / footer
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, theme: &Theme, status: Option<&str>) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(4.0);
        ui.label(
            RichText::new("🏠 Real Estate Price Dashboard")
                .size(28.0)
                .strong()
                .color(theme.title),
        );
        ui.label(
            RichText::new("Predict Boston housing prices using machine learning")
                .color(theme.subtitle),
        );
        if let Some(msg) = status {
            ui.label(RichText::new(msg).color(theme.error_text));
        }
        ui.add_space(4.0);
    });
}

pub fn footer(ui: &mut Ui, theme: &Theme) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Made with ❤ using egui | © 2025").color(theme.footer));
    });
}

// ---------------------------------------------------------------------------
// Input form
// ---------------------------------------------------------------------------

/// Render the two-column feature form. Returns one event per edited field.
pub fn input_form(ui: &mut Ui, inputs: &mut FeatureVector) -> Vec<DashboardEvent> {
    let mut events = Vec::new();
    let all: &[Feature] = &Feature::ALL;
    let (left, right) = all.split_at(LEFT_COLUMN_LEN);

    ui.columns(2, |cols: &mut [Ui]| {
        for (col, features) in cols.iter_mut().zip([left, right]) {
            egui::Grid::new(("feature_grid", features[0].name()))
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(col, |ui: &mut Ui| {
                    for &feature in features {
                        if feature_input(ui, inputs, feature) {
                            events.push(DashboardEvent::InputChanged(feature));
                        }
                        ui.end_row();
                    }
                });
        }
    });
    events
}

/// One labelled widget. Returns whether the value changed.
fn feature_input(ui: &mut Ui, inputs: &mut FeatureVector, feature: Feature) -> bool {
    let before = inputs.get(feature);
    ui.label(RichText::new(feature.name()).strong())
        .on_hover_text(feature.help());

    match inputs.field_mut(feature) {
        FieldMut::Float(value) => {
            let mut drag = egui::DragValue::new(value).speed(0.01).max_decimals(4);
            if let Some(range) = feature.bounds() {
                drag = drag.range(range);
            }
            ui.add(drag).on_hover_text(feature.help());
        }
        FieldMut::Integer(value) => {
            ui.add(egui::DragValue::new(value).speed(0.1))
                .on_hover_text(feature.help());
        }
        FieldMut::Choice(value) => {
            let choices: &[u8] = match feature.kind() {
                InputKind::Choice(choices) => choices,
                _ => &[],
            };
            egui::ComboBox::from_id_salt(feature.name())
                .selected_text(value.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for &choice in choices {
                        ui.selectable_value(&mut *value, choice, choice.to_string());
                    }
                })
                .response
                .on_hover_text(feature.help());
        }
    }

    inputs.get(feature) != before
}

/// Collapsible view of the record that will be passed to the model.
pub fn assembled_table(ui: &mut Ui, inputs: &FeatureVector) {
    let frame = inputs.to_frame();
    egui::CollapsingHeader::new("Assembled model input")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().at_least(48.0), frame.n_columns())
                    .header(20.0, |mut header| {
                        for name in &frame.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in &frame.rows {
                            body.row(18.0, |mut table_row| {
                                for value in row {
                                    table_row.col(|ui: &mut Ui| {
                                        ui.label(value.to_string());
                                    });
                                }
                            });
                        }
                    });
            });
        });
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Predict button plus the latest outcome.
pub fn prediction_panel(
    ui: &mut Ui,
    prediction: &Option<Result<Prediction, ModelError>>,
    theme: &Theme,
) -> Option<DashboardEvent> {
    ui.heading("🎯 Predicted House Price");

    let button = egui::Button::new(
        RichText::new("🚀 Predict House Price")
            .size(16.0)
            .color(theme.button_text),
    )
    .fill(theme.button)
    .corner_radius(8.0);
    let event = ui
        .add(button)
        .clicked()
        .then_some(DashboardEvent::PredictRequested);

    match prediction {
        Some(Ok(p)) => {
            ui.add_space(8.0);
            egui::Frame::default()
                .fill(theme.result_fill)
                .inner_margin(20.0)
                .corner_radius(10.0)
                .show(ui, |ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("💲 Estimated Price: {}", p.display_price()))
                            .size(20.0)
                            .strong()
                            .color(theme.result_text),
                    );
                });
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Prediction failed: {e}")).color(theme.error_text));
        }
        None => {}
    }

    event
}
