use rand::Rng;

use crate::data::features::{Feature, FeatureVector};
use crate::data::sample::{RoomSample, RoomSampleParams};
use crate::model::{ModelError, RegressionModel};
use crate::predict::{importance_bars, predict_price, ImportanceBar, Prediction};

// ---------------------------------------------------------------------------
// Events emitted by the UI
// ---------------------------------------------------------------------------

/// A user interaction the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardEvent {
    /// A form field was edited.
    InputChanged(Feature),
    /// The predict button was pressed.
    PredictRequested,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current form values.
    pub inputs: FeatureVector,

    /// Outcome of the latest predict request. Cleared by any other event.
    pub prediction: Option<Result<Prediction, ModelError>>,

    /// Importance bars, computed once from the loaded model.
    pub importances: Result<Vec<ImportanceBar>, ModelError>,

    /// Synthetic room-count sample behind the histogram.
    pub room_sample: Option<RoomSample>,

    pub sample_params: RoomSampleParams,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(model: &dyn RegressionModel, sample_params: RoomSampleParams) -> Self {
        let inputs = FeatureVector::default();
        let importances = importance_bars(model, &inputs.to_frame());
        if let Err(e) = &importances {
            log::error!("Cannot chart feature importances: {e}");
        }

        let mut state = Self {
            inputs,
            prediction: None,
            importances,
            room_sample: None,
            sample_params,
            status_message: None,
        };
        state.redraw_sample(&mut rand::thread_rng());
        state
    }

    /// Apply one event against the shared model.
    pub fn handle(&mut self, event: DashboardEvent, model: &dyn RegressionModel) {
        log::debug!("Handling {event:?}");
        match event {
            DashboardEvent::InputChanged(_) => {
                self.prediction = None;
            }
            DashboardEvent::PredictRequested => {
                let outcome = predict_price(model, &self.inputs);
                match &outcome {
                    Ok(p) => log::info!(
                        "Predicted {} (raw {:.4}) for {:?}",
                        p.display_price(),
                        p.raw,
                        self.inputs.values()
                    ),
                    Err(e) => log::error!("Prediction failed: {e}"),
                }
                self.prediction = Some(outcome);
            }
        }
        self.redraw_sample(&mut rand::thread_rng());
    }

    /// Draw a new synthetic sample for the histogram.
    pub fn redraw_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match RoomSample::draw(rng, &self.sample_params) {
            Ok(sample) => {
                self.room_sample = Some(sample);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to draw room sample: {e:#}");
                self.room_sample = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearModel;
    use crate::model::loader::parse_model;

    fn bundled() -> Box<dyn RegressionModel> {
        parse_model(include_str!("../RealEstates.json")).unwrap()
    }

    #[test]
    fn starts_with_defaults_and_no_prediction() {
        let model = bundled();
        let state = AppState::new(model.as_ref(), RoomSampleParams::default());
        assert_eq!(state.inputs, FeatureVector::default());
        assert!(state.prediction.is_none());
        assert_eq!(state.importances.as_ref().unwrap().len(), 13);
        assert_eq!(state.room_sample.as_ref().unwrap().values.len(), 100);
    }

    #[test]
    fn predict_then_edit_clears_result() {
        let model = bundled();
        let mut state = AppState::new(model.as_ref(), RoomSampleParams::default());

        state.handle(DashboardEvent::PredictRequested, model.as_ref());
        let shown = state.prediction.clone().unwrap().unwrap();
        assert_eq!(shown.display_price(), "$21983.33");

        state.inputs.set(Feature::Rm, 8.0);
        state.handle(DashboardEvent::InputChanged(Feature::Rm), model.as_ref());
        assert!(state.prediction.is_none());
    }

    #[test]
    fn schema_mismatch_is_kept_for_display() {
        let model = LinearModel::new(vec![1.0; 12], 0.0, None, None).unwrap();
        let mut state = AppState::new(&model, RoomSampleParams::default());
        assert!(state.importances.is_err());

        state.handle(DashboardEvent::PredictRequested, &model);
        assert!(matches!(
            state.prediction,
            Some(Err(ModelError::FeatureCount { .. }))
        ));
    }

    #[test]
    fn every_event_redraws_the_sample() {
        let model = bundled();
        let mut state = AppState::new(model.as_ref(), RoomSampleParams::default());
        let before = state.room_sample.as_ref().unwrap().values.clone();
        state.handle(DashboardEvent::InputChanged(Feature::Age), model.as_ref());
        assert_ne!(state.room_sample.as_ref().unwrap().values, before);
    }

    #[test]
    fn bad_sample_params_surface_a_status_message() {
        let model = bundled();
        let params = RoomSampleParams {
            std_dev: f64::NAN,
            ..RoomSampleParams::default()
        };
        let state = AppState::new(model.as_ref(), params);
        assert!(state.room_sample.is_none());
        assert!(state.status_message.is_some());
    }
}
