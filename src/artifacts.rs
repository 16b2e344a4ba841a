use crate::classifier::{Classifier, ModelArtifact};
use crate::config::ArtifactPaths;
use crate::encoder::LabelEncoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize artifact {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// The classifier and encoder, only ever held together.
#[derive(Debug)]
pub struct Artifacts {
    pub classifier: Classifier,
    pub encoder: LabelEncoder,
}

impl Artifacts {
    pub fn new(classifier: Classifier, encoder: LabelEncoder) -> Self {
        Self {
            classifier,
            encoder,
        }
    }
}

pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, ArtifactError> {
    let artifact: ModelArtifact = read_json(&paths.model)?;
    let classifier =
        Classifier::from_artifact(artifact).map_err(|reason| ArtifactError::Invalid {
            path: paths.model.clone(),
            reason,
        })?;
    let encoder: LabelEncoder = read_json(&paths.encoder)?;

    log::info!(
        "Loaded {} classifier from {} ({} probability estimates)",
        classifier.kind(),
        paths.model.display(),
        if classifier.is_probabilistic() {
            "with"
        } else {
            "without"
        }
    );
    log::info!(
        "Loaded label encoder from {} with {} classes",
        paths.encoder.display(),
        encoder.len()
    );
    Ok(Artifacts::new(classifier, encoder))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            ArtifactError::Deserialize {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
