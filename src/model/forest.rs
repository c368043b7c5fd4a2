//! Decision-tree ensembles: random forests and gradient-boosted trees.

use anyhow::{bail, ensure, Result};
use serde::Deserialize;

use super::{check_frame, ModelError, RegressionModel};
use crate::data::features::FeatureFrame;

/// Child index marking a leaf in the fitted-tree arrays.
const LEAF: i64 = -1;

// ---------------------------------------------------------------------------
// Serialized tree arrays
// ---------------------------------------------------------------------------

/// A fitted tree as parallel per-node arrays. Node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
    #[serde(default)]
    pub impurity: Option<Vec<f64>>,
    #[serde(default)]
    pub weighted_n_node_samples: Option<Vec<f64>>,
}

// ---------------------------------------------------------------------------
// DecisionTree
// ---------------------------------------------------------------------------

/// Structure-of-arrays regression tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    split_features: Box<[usize]>,
    thresholds: Box<[f64]>,
    /// `None` for leaves.
    children: Box<[Option<(usize, usize)>]>,
    values: Box<[f64]>,
    /// Per-node weighted impurity decrease, when the artifact carries it.
    impurity_decrease: Option<Box<[f64]>>,
}

impl DecisionTree {
    /// Validate the fitted arrays and build a tree over `n_features` inputs.
    pub fn from_arrays(arrays: TreeArrays, n_features: usize) -> Result<Self> {
        let n = arrays.value.len();
        ensure!(n > 0, "tree has no nodes");
        ensure!(
            arrays.children_left.len() == n
                && arrays.children_right.len() == n
                && arrays.feature.len() == n
                && arrays.threshold.len() == n,
            "tree arrays have mismatched lengths"
        );

        let mut split_features = Vec::with_capacity(n);
        let mut children = Vec::with_capacity(n);
        for node in 0..n {
            let (left, right) = (arrays.children_left[node], arrays.children_right[node]);
            if left == LEAF && right == LEAF {
                ensure!(arrays.value[node].is_finite(), "node {node}: leaf value is not finite");
                split_features.push(0);
                children.push(None);
                continue;
            }
            // Children are stored after their parent, so traversal always terminates.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    bail!("node {node}: child index {child} out of range");
                }
            }
            let feature = arrays.feature[node];
            if feature < 0 || feature as usize >= n_features {
                bail!("node {node}: split feature {feature} out of range for {n_features} features");
            }
            ensure!(
                !arrays.threshold[node].is_nan(),
                "node {node}: split threshold is NaN"
            );
            split_features.push(feature as usize);
            children.push(Some((left as usize, right as usize)));
        }

        let impurity_decrease = match (&arrays.impurity, &arrays.weighted_n_node_samples) {
            (Some(impurity), Some(weights)) => {
                ensure!(
                    impurity.len() == n && weights.len() == n,
                    "impurity arrays have mismatched lengths"
                );
                let decrease = children
                    .iter()
                    .enumerate()
                    .map(|(node, kids)| match kids {
                        Some((l, r)) => {
                            weights[node] * impurity[node]
                                - weights[*l] * impurity[*l]
                                - weights[*r] * impurity[*r]
                        }
                        None => 0.0,
                    })
                    .collect::<Vec<_>>();
                Some(decrease.into_boxed_slice())
            }
            _ => None,
        };

        Ok(Self {
            split_features: split_features.into_boxed_slice(),
            thresholds: arrays.threshold.into_boxed_slice(),
            children: children.into_boxed_slice(),
            values: arrays.value.into_boxed_slice(),
            impurity_decrease,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.values.len()
    }

    /// Walk from the root to a leaf; a row goes left when `x <= threshold`.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        while let Some((left, right)) = self.children[idx] {
            let x = row[self.split_features[idx]];
            idx = if x <= self.thresholds[idx] { left } else { right };
        }
        self.values[idx]
    }

    /// Mean decrease in impurity per feature, normalised to sum 1.
    /// `None` when the artifact did not record impurities.
    pub fn impurity_importances(&self, n_features: usize) -> Option<Vec<f64>> {
        let decrease = self.impurity_decrease.as_ref()?;
        let mut importances = vec![0.0; n_features];
        for (node, kids) in self.children.iter().enumerate() {
            if kids.is_some() {
                importances[self.split_features[node]] += decrease[node];
            }
        }
        normalize(&mut importances);
        Some(importances)
    }
}

/// Scale to sum 1. All-zero input is left untouched.
pub(crate) fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}

// ---------------------------------------------------------------------------
// TreeEnsemble
// ---------------------------------------------------------------------------

/// How per-tree outputs combine into a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    /// Random forest: average of the trees.
    Mean,
    /// Gradient boosting: `init + learning_rate * sum`.
    Boosted { init: f64, learning_rate: f64 },
}

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<DecisionTree>,
    aggregation: Aggregation,
    n_features: usize,
    feature_names: Option<Vec<String>>,
    importances: Vec<f64>,
}

impl TreeEnsemble {
    /// Build an ensemble. Importances come from `importances` when given,
    /// otherwise from the trees' recorded impurities.
    pub fn new(
        trees: Vec<DecisionTree>,
        aggregation: Aggregation,
        n_features: usize,
        feature_names: Option<Vec<String>>,
        importances: Option<Vec<f64>>,
    ) -> Result<Self> {
        ensure!(!trees.is_empty(), "ensemble has no trees");
        if let Aggregation::Boosted { init, learning_rate } = aggregation {
            ensure!(init.is_finite(), "init must be finite");
            ensure!(
                learning_rate.is_finite() && learning_rate > 0.0,
                "learning_rate must be positive, got {learning_rate}"
            );
        }

        let importances = match importances {
            Some(given) => given,
            None => forest_importances(&trees, n_features)?,
        };

        Ok(Self {
            trees,
            aggregation,
            n_features,
            feature_names,
            importances,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        match self.aggregation {
            Aggregation::Mean => sum / self.trees.len() as f64,
            Aggregation::Boosted {
                init,
                learning_rate,
            } => init + learning_rate * sum,
        }
    }
}

/// Average of per-tree impurity importances, re-normalised.
fn forest_importances(trees: &[DecisionTree], n_features: usize) -> Result<Vec<f64>> {
    let mut total = vec![0.0; n_features];
    for (i, tree) in trees.iter().enumerate() {
        let Some(per_tree) = tree.impurity_importances(n_features) else {
            bail!("tree {i} has no impurity data and no feature_importances were given");
        };
        for (acc, v) in total.iter_mut().zip(per_tree) {
            *acc += v;
        }
    }
    let n = trees.len() as f64;
    total.iter_mut().for_each(|v| *v /= n);
    normalize(&mut total);
    Ok(total)
}

impl RegressionModel for TreeEnsemble {
    fn kind(&self) -> &'static str {
        match self.aggregation {
            Aggregation::Mean => "random_forest",
            Aggregation::Boosted { .. } => "gradient_boosting",
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, ModelError> {
        check_frame(frame, self.n_features, self.feature_names.as_deref())?;
        Ok(frame.rows.iter().map(|row| self.predict_row(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root splits feature 0 at 0.5; the right child splits feature 1 at 10.
    fn arrays() -> TreeArrays {
        TreeArrays {
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![0, -2, 1, -2, -2],
            threshold: vec![0.5, -2.0, 10.0, -2.0, -2.0],
            value: vec![5.0, 1.0, 7.0, 6.0, 9.0],
            impurity: Some(vec![10.0, 0.0, 4.0, 1.0, 1.0]),
            weighted_n_node_samples: Some(vec![10.0, 5.0, 5.0, 3.0, 2.0]),
        }
    }

    #[test]
    fn predict_row_follows_thresholds() {
        let tree = DecisionTree::from_arrays(arrays(), 2).unwrap();
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.predict_row(&[0.5, 0.0]), 1.0);
        assert_eq!(tree.predict_row(&[0.6, 10.0]), 6.0);
        assert_eq!(tree.predict_row(&[0.6, 10.1]), 9.0);
    }

    #[test]
    fn nan_goes_right() {
        let tree = DecisionTree::from_arrays(arrays(), 2).unwrap();
        assert_eq!(tree.predict_row(&[f64::NAN, f64::NAN]), 9.0);
    }

    #[test]
    fn impurity_importances_are_normalised() {
        let tree = DecisionTree::from_arrays(arrays(), 2).unwrap();
        // Root: 100 - 0 - 20 = 80. Right split: 20 - 3 - 2 = 15.
        let imp = tree.impurity_importances(2).unwrap();
        assert!((imp[0] - 80.0 / 95.0).abs() < 1e-12);
        assert!((imp[1] - 15.0 / 95.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_back_edges() {
        let mut bad = arrays();
        bad.children_left[2] = 0;
        assert!(DecisionTree::from_arrays(bad, 2).is_err());
    }

    #[test]
    fn rejects_out_of_range_feature() {
        assert!(DecisionTree::from_arrays(arrays(), 1).is_err());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let mut bad = arrays();
        bad.threshold.pop();
        assert!(DecisionTree::from_arrays(bad, 2).is_err());
    }

    #[test]
    fn rejects_empty_tree() {
        let empty = TreeArrays {
            children_left: vec![],
            children_right: vec![],
            feature: vec![],
            threshold: vec![],
            value: vec![],
            impurity: None,
            weighted_n_node_samples: None,
        };
        assert!(DecisionTree::from_arrays(empty, 2).is_err());
    }

    #[test]
    fn rejects_non_finite_leaf_value() {
        for value in [f64::NAN, f64::INFINITY] {
            let mut bad = arrays();
            bad.value[3] = value;
            assert!(DecisionTree::from_arrays(bad, 2).is_err());
        }
    }

    #[test]
    fn boosted_parameters_are_validated() {
        let tree = DecisionTree::from_arrays(arrays(), 2).unwrap();
        let boosted = |init, learning_rate| {
            TreeEnsemble::new(
                vec![tree.clone()],
                Aggregation::Boosted {
                    init,
                    learning_rate,
                },
                2,
                None,
                None,
            )
        };
        assert!(boosted(f64::NAN, 0.1).is_err());
        assert!(boosted(f64::INFINITY, 0.1).is_err());
        assert!(boosted(1.0, 0.0).is_err());
        assert!(boosted(1.0, f64::NAN).is_err());
        assert_eq!(boosted(1.0, 0.1).unwrap().num_trees(), 1);
    }

    #[test]
    fn forest_averages_and_boosting_sums() {
        let trees = vec![
            DecisionTree::from_arrays(arrays(), 2).unwrap(),
            DecisionTree::from_arrays(arrays(), 2).unwrap(),
        ];
        let frame = FeatureFrame::new(
            vec!["a".into(), "b".into()],
            vec![vec![0.0, 0.0], vec![1.0, 20.0]],
        );

        let forest = TreeEnsemble::new(trees.clone(), Aggregation::Mean, 2, None, None).unwrap();
        assert_eq!(forest.kind(), "random_forest");
        assert_eq!(forest.predict(&frame).unwrap(), vec![1.0, 9.0]);

        let boosted = TreeEnsemble::new(
            trees,
            Aggregation::Boosted {
                init: 2.0,
                learning_rate: 0.5,
            },
            2,
            None,
            None,
        )
        .unwrap();
        assert_eq!(boosted.kind(), "gradient_boosting");
        assert_eq!(boosted.predict(&frame).unwrap(), vec![3.0, 11.0]);
    }

    #[test]
    fn missing_impurities_need_explicit_importances() {
        let mut plain = arrays();
        plain.impurity = None;
        let tree = DecisionTree::from_arrays(plain, 2).unwrap();
        assert!(TreeEnsemble::new(vec![tree.clone()], Aggregation::Mean, 2, None, None).is_err());

        let model =
            TreeEnsemble::new(vec![tree], Aggregation::Mean, 2, None, Some(vec![0.3, 0.7]))
                .unwrap();
        assert_eq!(model.feature_importances(), &[0.3, 0.7]);
    }

    #[test]
    fn predict_checks_feature_names() {
        let tree = DecisionTree::from_arrays(arrays(), 2).unwrap();
        let model = TreeEnsemble::new(
            vec![tree],
            Aggregation::Mean,
            2,
            Some(vec!["a".into(), "b".into()]),
            None,
        )
        .unwrap();
        let swapped = FeatureFrame::new(vec!["b".into(), "a".into()], vec![vec![0.0, 0.0]]);
        assert!(matches!(
            model.predict(&swapped),
            Err(ModelError::FeatureNames { .. })
        ));
    }
}
