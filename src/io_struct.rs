use serde::{Deserialize, Serialize};

/// Number of features every classifier artifact is trained on.
pub const N_FEATURES: usize = 7;

/// Feature names in training order.
pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

pub type FeatureVector = [f64; N_FEATURES];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CropFeatures {
    /// Nitrogen content in soil
    #[serde(rename = "N")]
    pub n: f64,
    /// Phosphorus content in soil
    #[serde(rename = "P")]
    pub p: f64,
    /// Potassium content in soil
    #[serde(rename = "K")]
    pub k: f64,
    /// Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    pub ph: f64,
    /// Millimetres
    pub rainfall: f64,
}

impl CropFeatures {
    /// Lays the fields out in the order the classifier was trained with.
    pub fn to_feature_vector(&self) -> FeatureVector {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CropPrediction {
    pub predicted_crop: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub n_features: usize,
    pub probabilistic: bool,
    pub classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_vector_follows_training_order() {
        let features: CropFeatures = serde_json::from_value(json!({
            "N": 90, "P": 42, "K": 43,
            "temperature": 20.8, "humidity": 82, "ph": 6.5, "rainfall": 202.9
        }))
        .unwrap();
        assert_eq!(
            features.to_feature_vector(),
            [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = serde_json::from_value::<CropFeatures>(json!({
            "N": 90, "P": 42, "K": 43,
            "temperature": 20.8, "humidity": 82, "ph": 6.5
        }))
        .unwrap_err();
        assert!(err.to_string().contains("rainfall"));
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let result = serde_json::from_value::<CropFeatures>(json!({
            "N": "lots", "P": 42, "K": 43,
            "temperature": 20.8, "humidity": 82, "ph": 6.5, "rainfall": 202.9
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<CropFeatures>(json!({
            "N": null, "P": 42, "K": 43,
            "temperature": 20.8, "humidity": 82, "ph": 6.5, "rainfall": 202.9
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_confidence_serializes_as_null() {
        let prediction = CropPrediction {
            predicted_crop: "rice".to_string(),
            confidence: None,
        };
        assert_eq!(
            serde_json::to_value(&prediction).unwrap(),
            json!({"predicted_crop": "rice", "confidence": null})
        );
    }
}
