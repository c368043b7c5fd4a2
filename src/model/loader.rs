use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use super::forest::{Aggregation, DecisionTree, TreeArrays, TreeEnsemble};
use super::linear::LinearModel;
use super::RegressionModel;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a fitted model artifact from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – estimator arrays, see [`ModelArtifact`]
pub fn load_model(path: &Path) -> Result<Box<dyn RegressionModel>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading model artifact {}", path.display()))?;
            parse_model(&text).with_context(|| format!("loading model from {}", path.display()))
        }
        other => bail!("Unsupported model file extension: .{other}"),
    }
}

/// Parse and validate a JSON model artifact.
pub fn parse_model(text: &str) -> Result<Box<dyn RegressionModel>> {
    let artifact: ModelArtifact = serde_json::from_str(text).context("parsing model JSON")?;
    let model = artifact.build()?;
    log::info!(
        "Loaded {} model with {} features {:?}",
        model.kind(),
        model.n_features(),
        model.feature_names().unwrap_or_default()
    );
    Ok(model)
}

// ---------------------------------------------------------------------------
// Artifact schema
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "estimator": "random_forest",
///   "n_features": 13,
///   "feature_names": ["CRIM", "ZN", ...],
///   "trees": [
///     {
///       "children_left":  [1, -1, -1],
///       "children_right": [2, -1, -1],
///       "feature":        [5, -2, -2],
///       "threshold":      [6.94, -2.0, -2.0],
///       "value":          [22.5, 19.9, 37.2],
///       "impurity":       [84.4, 40.3, 79.7],
///       "weighted_n_node_samples": [506, 430, 76]
///     }
///   ]
/// }
/// ```
///
/// `gradient_boosting` adds `init` and `learning_rate`; `linear` carries
/// `coefficients` and `intercept` instead of `trees`. Any estimator may give
/// `feature_importances` explicitly.
#[derive(Debug, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest {
        #[serde(flatten)]
        schema: Schema,
        trees: Vec<TreeArrays>,
    },
    GradientBoosting {
        #[serde(flatten)]
        schema: Schema,
        trees: Vec<TreeArrays>,
        init: f64,
        learning_rate: f64,
    },
    Linear {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        #[serde(default)]
        feature_importances: Option<Vec<f64>>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

/// Input schema shared by the tree estimators.
#[derive(Debug, Deserialize)]
pub struct Schema {
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

impl ModelArtifact {
    /// Validate the artifact and turn it into a callable model.
    pub fn build(self) -> Result<Box<dyn RegressionModel>> {
        match self {
            ModelArtifact::RandomForest { schema, trees } => {
                build_ensemble(schema, trees, Aggregation::Mean)
            }
            ModelArtifact::GradientBoosting {
                schema,
                trees,
                init,
                learning_rate,
            } => build_ensemble(
                schema,
                trees,
                Aggregation::Boosted {
                    init,
                    learning_rate,
                },
            ),
            ModelArtifact::Linear {
                feature_names,
                feature_importances,
                coefficients,
                intercept,
            } => {
                let n_features = coefficients.len();
                check_schema(n_features, &feature_names, &feature_importances)?;
                let model =
                    LinearModel::new(coefficients, intercept, feature_names, feature_importances)?;
                Ok(Box::new(model))
            }
        }
    }
}

fn build_ensemble(
    schema: Schema,
    trees: Vec<TreeArrays>,
    aggregation: Aggregation,
) -> Result<Box<dyn RegressionModel>> {
    let Schema {
        n_features,
        feature_names,
        feature_importances,
    } = schema;
    ensure!(n_features > 0, "n_features must be positive");
    check_schema(n_features, &feature_names, &feature_importances)?;

    let trees = trees
        .into_iter()
        .enumerate()
        .map(|(i, arrays)| {
            DecisionTree::from_arrays(arrays, n_features).with_context(|| format!("tree {i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let model = TreeEnsemble::new(
        trees,
        aggregation,
        n_features,
        feature_names,
        feature_importances,
    )?;
    log::debug!("Built ensemble of {} trees", model.num_trees());
    Ok(Box::new(model))
}

fn check_schema(
    n_features: usize,
    feature_names: &Option<Vec<String>>,
    feature_importances: &Option<Vec<f64>>,
) -> Result<()> {
    if let Some(names) = feature_names {
        ensure!(
            names.len() == n_features,
            "{} feature names given for {n_features} features",
            names.len()
        );
    }
    if let Some(imp) = feature_importances {
        ensure!(
            imp.len() == n_features,
            "{} feature importances given for {n_features} features",
            imp.len()
        );
        ensure!(
            imp.iter().all(|v| v.is_finite()),
            "feature importances must be finite"
        );
    }
    Ok(())
}
