//! Classifier artifacts.
//!
//! An artifact is a serialized `linfa` model tagged with its `type`, the
//! same layout the training side writes. Loading fixes the capability of
//! the classifier: models that expose class probabilities become
//! [`Classifier::Probabilistic`], the rest become [`Classifier::Point`].

use crate::io_struct::{FEATURE_NAMES, FeatureVector, N_FEATURES};
use linfa::composing::MultiClassModel;
use linfa::prelude::Pr;
use linfa::traits::Predict;
use linfa_bayes::{GaussianNb, NaiveBayes};
use linfa_logistic::MultiFittedLogisticRegression;
use linfa_svm::Svm;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("Input contains non-finite value {value} for feature '{feature}'")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("{kind} produced non-finite output for the given input")]
    NonFiniteOutput { kind: &'static str },

    #[error("Empty input batch")]
    EmptyBatch,

    #[error("{kind} returned {got} results for {expected} rows")]
    OutputShape {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{kind} failed: {message}")]
    Failed { kind: &'static str, message: String },
}

pub trait PointClassifier: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Returns one label id per row of `records`.
    fn predict(&self, records: &Array2<f64>) -> Array1<usize>;
}

pub trait ProbabilisticClassifier: PointClassifier {
    /// Returns one class distribution per row of `records`.
    fn predict_proba(&self, records: &Array2<f64>) -> Array2<f64>;
}

/// A linfa model plus the metadata needed to feed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelWithMeta<M> {
    pub n_features: usize,
    pub model: M,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelArtifact {
    DecisionTree(ModelWithMeta<DecisionTree<f64, usize>>),
    GaussianNaiveBayes(ModelWithMeta<GaussianNb<f64, usize>>),
    LogisticRegression(ModelWithMeta<MultiFittedLogisticRegression<f64, usize>>),
    SVMMultiClass(ModelWithMeta<Vec<(usize, Svm<f64, Pr>)>>),
}

impl ModelArtifact {
    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::DecisionTree(m) => m.n_features,
            ModelArtifact::GaussianNaiveBayes(m) => m.n_features,
            ModelArtifact::LogisticRegression(m) => m.n_features,
            ModelArtifact::SVMMultiClass(m) => m.n_features,
        }
    }
}

impl PointClassifier for ModelWithMeta<DecisionTree<f64, usize>> {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn predict(&self, records: &Array2<f64>) -> Array1<usize> {
        self.model.predict(records)
    }
}

impl PointClassifier for ModelWithMeta<GaussianNb<f64, usize>> {
    fn kind(&self) -> &'static str {
        "gaussian_naive_bayes"
    }

    fn predict(&self, records: &Array2<f64>) -> Array1<usize> {
        Predict::predict(&self.model, records)
    }
}

impl ProbabilisticClassifier for ModelWithMeta<GaussianNb<f64, usize>> {
    fn predict_proba(&self, records: &Array2<f64>) -> Array2<f64> {
        let (proba, _classes) = self.model.predict_proba(records.view());
        proba
    }
}

impl PointClassifier for ModelWithMeta<MultiFittedLogisticRegression<f64, usize>> {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict(&self, records: &Array2<f64>) -> Array1<usize> {
        self.model.predict(records)
    }
}

impl ProbabilisticClassifier for ModelWithMeta<MultiFittedLogisticRegression<f64, usize>> {
    fn predict_proba(&self, records: &Array2<f64>) -> Array2<f64> {
        self.model.predict_probabilities(records)
    }
}

impl PointClassifier for ModelWithMeta<Vec<(usize, Svm<f64, Pr>)>> {
    fn kind(&self) -> &'static str {
        "svm_multi_class"
    }

    fn predict(&self, records: &Array2<f64>) -> Array1<usize> {
        let one_vs_all: MultiClassModel<Array2<f64>, usize> =
            self.model.iter().cloned().collect();
        one_vs_all.predict(records)
    }
}

pub enum Classifier {
    Probabilistic(Box<dyn ProbabilisticClassifier>),
    Point(Box<dyn PointClassifier>),
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::Probabilistic(model) => write!(f, "Probabilistic({})", model.kind()),
            Classifier::Point(model) => write!(f, "Point({})", model.kind()),
        }
    }
}

impl Classifier {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, String> {
        let n_features = artifact.n_features();
        if n_features != N_FEATURES {
            return Err(format!(
                "model expects {} features, service provides {}",
                n_features, N_FEATURES
            ));
        }
        let classifier = match artifact {
            ModelArtifact::DecisionTree(model) => Classifier::Point(Box::new(model)),
            ModelArtifact::GaussianNaiveBayes(model) => Classifier::Probabilistic(Box::new(model)),
            ModelArtifact::LogisticRegression(model) => Classifier::Probabilistic(Box::new(model)),
            ModelArtifact::SVMMultiClass(model) => {
                if model.model.is_empty() {
                    return Err("SVM artifact has no binary models".to_string());
                }
                Classifier::Point(Box::new(model))
            }
        };
        Ok(classifier)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Probabilistic(model) => model.kind(),
            Classifier::Point(model) => model.kind(),
        }
    }

    pub fn is_probabilistic(&self) -> bool {
        matches!(self, Classifier::Probabilistic(_))
    }

    pub fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>, ModelError> {
        let records = to_records(batch)?;
        let kind = self.kind();
        let labels = guarded(kind, || match self {
            Classifier::Probabilistic(model) => model.predict(&records),
            Classifier::Point(model) => model.predict(&records),
        })?;
        if labels.len() != batch.len() {
            return Err(ModelError::OutputShape {
                kind,
                expected: batch.len(),
                got: labels.len(),
            });
        }
        Ok(labels.to_vec())
    }

    /// `None` when the classifier has no probability estimates.
    pub fn predict_proba(
        &self,
        batch: &[FeatureVector],
    ) -> Option<Result<Vec<Vec<f64>>, ModelError>> {
        let Classifier::Probabilistic(model) = self else {
            return None;
        };
        let kind = model.kind();
        let result = to_records(batch)
            .and_then(|records| guarded(kind, || model.predict_proba(&records)))
            .and_then(|proba| {
                if proba.nrows() != batch.len() {
                    return Err(ModelError::OutputShape {
                        kind,
                        expected: batch.len(),
                        got: proba.nrows(),
                    });
                }
                if proba.iter().any(|p| !p.is_finite()) {
                    return Err(ModelError::NonFiniteOutput { kind });
                }
                Ok(proba.rows().into_iter().map(|row| row.to_vec()).collect())
            });
        Some(result)
    }
}

fn to_records(batch: &[FeatureVector]) -> Result<Array2<f64>, ModelError> {
    if batch.is_empty() {
        return Err(ModelError::EmptyBatch);
    }
    for row in batch {
        for (&feature, &value) in FEATURE_NAMES.iter().zip(row) {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteFeature { feature, value });
            }
        }
    }
    let flat: Vec<f64> = batch.iter().flatten().copied().collect();
    Array2::from_shape_vec((batch.len(), N_FEATURES), flat).map_err(|e| ModelError::Failed {
        kind: "feature assembly",
        message: e.to_string(),
    })
}

/// linfa reports numerical trouble by panicking; turn that into an error
/// for the request instead of tearing down the worker.
fn guarded<T>(kind: &'static str, f: impl FnOnce() -> T) -> Result<T, ModelError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "model panicked".to_string());
        ModelError::Failed { kind, message }
    })
}
