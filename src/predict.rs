use crate::data::features::{FeatureFrame, FeatureVector};
use crate::model::{ModelError, RegressionModel};

/// The model's target is the median home value in $1000s.
pub const PRICE_UNIT: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Prediction invocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Model output in training units.
    pub raw: f64,
    /// `raw` scaled to dollars.
    pub price: f64,
}

impl Prediction {
    pub fn from_raw(raw: f64) -> Self {
        Self {
            raw,
            price: raw * PRICE_UNIT,
        }
    }

    /// Dollar amount with two decimals, e.g. `$21983.33`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Assemble the record and run the model on it. Any schema mismatch
/// surfaces as the error raised by the model.
pub fn predict_price(
    model: &dyn RegressionModel,
    features: &FeatureVector,
) -> Result<Prediction, ModelError> {
    let frame = features.to_frame();
    let output = model.predict(&frame)?;
    let raw = output.first().copied().ok_or(ModelError::EmptyOutput)?;
    Ok(Prediction::from_raw(raw))
}

// ---------------------------------------------------------------------------
// Feature importance bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceBar {
    pub name: String,
    pub importance: f64,
}

/// One bar per column of `frame`, in column order.
pub fn importance_bars(
    model: &dyn RegressionModel,
    frame: &FeatureFrame,
) -> Result<Vec<ImportanceBar>, ModelError> {
    let importances = model.feature_importances();
    if importances.len() != frame.n_columns() {
        return Err(ModelError::ImportanceLength {
            expected: frame.n_columns(),
            got: importances.len(),
        });
    }
    Ok(frame
        .columns
        .iter()
        .zip(importances)
        .map(|(name, &importance)| ImportanceBar {
            name: name.clone(),
            importance,
        })
        .collect())
}
