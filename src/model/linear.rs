//! Ordinary linear regression.

use anyhow::{ensure, Result};

use super::forest::normalize;
use super::{check_frame, ModelError, RegressionModel};
use crate::data::features::FeatureFrame;

#[derive(Debug, Clone)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
    feature_names: Option<Vec<String>>,
    importances: Vec<f64>,
}

impl LinearModel {
    /// Without explicit importances, each column's share of `Σ|coef|` is used.
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        feature_names: Option<Vec<String>>,
        importances: Option<Vec<f64>>,
    ) -> Result<Self> {
        ensure!(!coefficients.is_empty(), "linear model has no coefficients");
        ensure!(
            coefficients.iter().all(|c| c.is_finite()) && intercept.is_finite(),
            "linear model parameters must be finite"
        );

        let importances = importances.unwrap_or_else(|| {
            let mut abs: Vec<f64> = coefficients.iter().map(|c| c.abs()).collect();
            normalize(&mut abs);
            abs
        });

        Ok(Self {
            coefficients,
            intercept,
            feature_names,
            importances,
        })
    }
}

impl RegressionModel for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, ModelError> {
        check_frame(frame, self.n_features(), self.feature_names.as_deref())?;
        Ok(frame
            .rows
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, c)| x * c)
                        .sum::<f64>()
            })
            .collect())
    }
}
