use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::PushfitError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_SIZE: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Fitness cases each predictor samples.
    pub sample_size: usize,
    pub predictor_count: usize,
    pub seed: Option<u64>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            predictor_count: 4,
            seed: None,
        }
    }
}

impl ConfigSection for PredictionConfig {
    fn section_name() -> &'static str {
        "prediction"
    }

    fn validate(&self) -> Result<(), PushfitError> {
        if self.sample_size == 0 {
            return Err(PushfitError::Configuration(
                "Sample size must be at least 1".to_string()
            ));
        }
        if self.predictor_count == 0 {
            return Err(PushfitError::Configuration(
                "Predictor count must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Prediction".to_string(),
            fields: vec![
                FieldManifest {
                    name: "sample_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(DEFAULT_SAMPLE_SIZE),
                    min: Some(1.0),
                    max: None,
                    description: "Fitness cases sampled by each predictor".to_string(),
                },
                FieldManifest {
                    name: "predictor_count".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(4),
                    min: Some(1.0),
                    max: None,
                    description: "Number of predictors bound by the driver".to_string(),
                },
                FieldManifest {
                    name: "seed".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::Value::Null,
                    min: None,
                    max: None,
                    description: "Random seed; entropy when absent".to_string(),
                },
            ],
        }
    }
}
