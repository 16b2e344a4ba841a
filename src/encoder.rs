use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EncoderError {
    #[error("y contains previously unseen label id {id} (encoder knows {n_classes} classes)")]
    UnknownLabelId { id: usize, n_classes: usize },

    #[error("y contains previously unseen label '{label}'")]
    UnknownLabel { label: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EncoderRepr {
    Object { classes: Vec<String> },
    Bare(Vec<String>),
}

/// Bidirectional mapping between crop names and the ids the classifier
/// was trained against. An id is the position of its name in `classes`.
#[derive(Debug, Clone, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl<'de> Deserialize<'de> for LabelEncoder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let classes = match EncoderRepr::deserialize(deserializer)? {
            EncoderRepr::Object { classes } | EncoderRepr::Bare(classes) => classes,
        };
        LabelEncoder::new(classes).map_err(serde::de::Error::custom)
    }
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        let mut index = HashMap::with_capacity(classes.len());
        for (id, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), id).is_some() {
                return Err(format!("duplicate class label '{}'", label));
            }
        }
        Ok(Self { classes, index })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, label: &str) -> Result<usize, EncoderError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| EncoderError::UnknownLabel {
                label: label.to_string(),
            })
    }

    pub fn inverse_transform(&self, id: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(id)
            .map(String::as_str)
            .ok_or(EncoderError::UnknownLabelId {
                id,
                n_classes: self.classes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crops() -> LabelEncoder {
        serde_json::from_str(r#"{"classes": ["apple", "maize", "rice"]}"#).unwrap()
    }

    #[test]
    fn test_round_trip_between_names_and_ids() {
        let encoder = crops();
        assert_eq!(encoder.transform("maize").unwrap(), 1);
        assert_eq!(encoder.inverse_transform(2).unwrap(), "rice");
        assert_eq!(
            encoder.transform("wheat"),
            Err(EncoderError::UnknownLabel {
                label: "wheat".to_string()
            })
        );
    }

    #[test]
    fn test_bare_array_is_accepted() {
        let encoder: LabelEncoder = serde_json::from_str(r#"["coffee", "jute"]"#).unwrap();
        assert_eq!(encoder.len(), 2);
        assert_eq!(encoder.inverse_transform(0).unwrap(), "coffee");
    }

    #[test]
    fn test_unknown_id_fails_to_decode() {
        let encoder = crops();
        assert_eq!(
            encoder.inverse_transform(3),
            Err(EncoderError::UnknownLabelId {
                id: 3,
                n_classes: 3
            })
        );
        assert!(encoder.transform("wheat").is_err());
    }

    #[test]
    fn test_duplicate_or_empty_classes_fail_to_deserialize() {
        assert!(serde_json::from_str::<LabelEncoder>(r#"["rice", "rice"]"#).is_err());
        assert!(serde_json::from_str::<LabelEncoder>(r#"{"classes": []}"#).is_err());
        assert!(serde_json::from_str::<LabelEncoder>(r#"{"labels": ["rice"]}"#).is_err());
    }
}
