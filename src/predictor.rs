use crate::artifacts::Artifacts;
use crate::error::PredictionError;
use crate::io_struct::{CropFeatures, CropPrediction};

/// Runs one feature record through the classifier and decodes the label.
pub fn predict_crop(
    artifacts: &Artifacts,
    features: &CropFeatures,
) -> Result<CropPrediction, PredictionError> {
    let batch = [features.to_feature_vector()];

    let label_id = artifacts
        .classifier
        .predict(&batch)?
        .first()
        .copied()
        .ok_or(PredictionError::MissingOutput(batch.len()))?;

    let confidence = match artifacts.classifier.predict_proba(&batch) {
        Some(distributions) => {
            let distributions = distributions?;
            let distribution = distributions
                .first()
                .ok_or(PredictionError::MissingOutput(batch.len()))?;
            Some(distribution.iter().copied().fold(0.0, f64::max))
        }
        None => None,
    };

    let predicted_crop = artifacts.encoder.inverse_transform(label_id)?.to_string();

    Ok(CropPrediction {
        predicted_crop,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::{CROPS, SAMPLE, fit_naive_bayes, fit_tree};
    use crate::classifier::{Classifier, ModelArtifact};
    use crate::encoder::{EncoderError, LabelEncoder};

    fn artifacts(model: ModelArtifact, classes: &[&str]) -> Artifacts {
        Artifacts::new(
            Classifier::from_artifact(model).unwrap(),
            LabelEncoder::new(classes.iter().map(|c| c.to_string()).collect()).unwrap(),
        )
    }

    fn sample() -> CropFeatures {
        let [n, p, k, temperature, humidity, ph, rainfall] = SAMPLE;
        CropFeatures {
            n,
            p,
            k,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }

    #[test]
    fn test_probabilistic_prediction_reports_max_probability() {
        let artifacts = artifacts(fit_naive_bayes(), &CROPS);
        let prediction = predict_crop(&artifacts, &sample()).unwrap();
        assert_eq!(prediction.predicted_crop, "rice");

        let proba = artifacts
            .classifier
            .predict_proba(&[SAMPLE])
            .unwrap()
            .unwrap();
        let max = proba[0].iter().copied().fold(0.0, f64::max);
        assert_eq!(prediction.confidence, Some(max));
        assert!((0.0..=1.0).contains(&max));
    }

    #[test]
    fn test_point_prediction_has_no_confidence() {
        let artifacts = artifacts(fit_tree(), &CROPS);
        let prediction = predict_crop(&artifacts, &sample()).unwrap();
        assert_eq!(prediction.predicted_crop, "rice");
        assert_eq!(prediction.confidence, None);
    }

    #[test]
    fn test_label_outside_encoder_is_a_prediction_error() {
        let artifacts = artifacts(fit_tree(), &["chickpea", "maize"]);
        assert_eq!(
            predict_crop(&artifacts, &sample()),
            Err(PredictionError::Decode(EncoderError::UnknownLabelId {
                id: 2,
                n_classes: 2
            }))
        );
    }

    #[test]
    fn test_repeated_input_gives_identical_prediction() {
        let artifacts = artifacts(fit_naive_bayes(), &CROPS);
        let first = predict_crop(&artifacts, &sample()).unwrap();
        for _ in 0..10 {
            assert_eq!(predict_crop(&artifacts, &sample()).unwrap(), first);
        }
    }
}
