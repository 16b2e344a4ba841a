use crop_recommender_rs::classifier::{ModelArtifact, ModelWithMeta};
use crop_recommender_rs::config::{ArtifactPaths, DEFAULT_ENCODER_FILE, DEFAULT_MODEL_FILE};
use crop_recommender_rs::io_struct::{FeatureVector, N_FEATURES};
use linfa::Dataset;
use linfa::traits::Fit;
use linfa_bayes::GaussianNb;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use tempfile::TempDir;

pub const CROPS: [&str; 3] = ["chickpea", "maize", "rice"];

/// Three well separated crop profiles; label ids index into `CROPS`.
fn crop_dataset() -> Dataset<f64, usize, ndarray::Ix1> {
    let centres: [FeatureVector; 3] = [
        [40.0, 67.0, 80.0, 18.0, 17.0, 7.3, 80.0],
        [78.0, 48.0, 20.0, 22.0, 65.0, 6.2, 85.0],
        [80.0, 48.0, 40.0, 23.7, 82.0, 6.4, 236.0],
    ];
    let mut flat = Vec::new();
    let mut targets = Vec::new();
    for (label, centre) in centres.iter().enumerate() {
        for i in 0..12 {
            for (f, value) in centre.iter().enumerate() {
                let step = (((i + f) * 7) % 5) as f64 - 2.0;
                flat.push(value + step * (value * 0.05 + 0.1));
            }
            targets.push(label);
        }
    }
    let records = Array2::from_shape_vec((targets.len(), N_FEATURES), flat).unwrap();
    Dataset::new(records, Array1::from(targets))
}

pub fn naive_bayes() -> ModelArtifact {
    ModelArtifact::GaussianNaiveBayes(ModelWithMeta {
        n_features: N_FEATURES,
        model: GaussianNb::params().fit(&crop_dataset()).unwrap(),
    })
}

pub fn decision_tree() -> ModelArtifact {
    ModelArtifact::DecisionTree(ModelWithMeta {
        n_features: N_FEATURES,
        model: DecisionTree::params().fit(&crop_dataset()).unwrap(),
    })
}

/// Writes `model` and a `CROPS` encoder under the default file names.
pub fn write_artifacts(model: &ModelArtifact) -> (TempDir, ArtifactPaths) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(DEFAULT_MODEL_FILE),
        serde_json::to_string(model).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join(DEFAULT_ENCODER_FILE),
        serde_json::json!({ "classes": CROPS }).to_string(),
    )
    .unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    (dir, paths)
}
