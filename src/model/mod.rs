/// Model layer: the loaded estimator and its prediction contract.
///
/// Architecture:
/// ```text
///   RealEstates.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate artifact → Box<dyn RegressionModel>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────┐
///   │ forest  /  linear     │  predict(FeatureFrame), feature_importances
///   └──────────────────────┘
/// ```
pub mod forest;
pub mod linear;
pub mod loader;

use thiserror::Error;

use crate::data::features::FeatureFrame;

/// Failures raised by a loaded model when it is called.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("X has {got} features, but the model is expecting {expected} features as input")]
    FeatureCount { expected: usize, got: usize },

    #[error("feature names must match those seen at fit time, in the same order: expected {expected:?}, got {got:?}")]
    FeatureNames {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model exposes {got} feature importances for {expected} input columns")]
    ImportanceLength { expected: usize, got: usize },
}

/// A fitted regression estimator, immutable once loaded.
pub trait RegressionModel: Send + Sync {
    /// Estimator family, e.g. `"random_forest"`.
    fn kind(&self) -> &'static str;

    /// Number of input columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Column names seen at fit time, when the artifact recorded them.
    fn feature_names(&self) -> Option<&[String]>;

    /// Relative contribution of each input column, in column order.
    fn feature_importances(&self) -> &[f64];

    /// Predict one value per row of `frame`.
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, ModelError>;
}

/// Reject frames whose shape or column names differ from the fitted schema.
pub(crate) fn check_frame(
    frame: &FeatureFrame,
    n_features: usize,
    feature_names: Option<&[String]>,
) -> Result<(), ModelError> {
    if frame.n_columns() != n_features {
        return Err(ModelError::FeatureCount {
            expected: n_features,
            got: frame.n_columns(),
        });
    }
    if let Some(expected) = feature_names {
        if expected != frame.columns.as_slice() {
            return Err(ModelError::FeatureNames {
                expected: expected.to_vec(),
                got: frame.columns.clone(),
            });
        }
    }
    if let Some(row) = frame.rows.iter().find(|r| r.len() != n_features) {
        return Err(ModelError::FeatureCount {
            expected: n_features,
            got: row.len(),
        });
    }
    Ok(())
}
