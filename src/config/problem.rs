use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::PushfitError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EXECUTION_LIMIT: usize = 150;
pub const DEFAULT_FAILURE_ERROR: f64 = 1.0e9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    pub kind: ProblemKind,
    /// Fitness cases as a nested list, e.g. `[[1 2][3 5]]`.
    pub test_cases: String,
    /// Maximum instructions a candidate may execute per fitness case.
    pub execution_limit: usize,
    /// Error reported when a candidate leaves no usable result.
    pub failure_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemKind {
    IntegerRegression,
    FloatRegression,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            kind: ProblemKind::IntegerRegression,
            test_cases: String::new(),
            execution_limit: DEFAULT_EXECUTION_LIMIT,
            failure_error: DEFAULT_FAILURE_ERROR,
        }
    }
}

impl ConfigSection for ProblemConfig {
    fn section_name() -> &'static str {
        "problem"
    }

    fn validate(&self) -> Result<(), PushfitError> {
        if self.execution_limit == 0 {
            return Err(PushfitError::Configuration(
                "Execution limit must be at least 1".to_string()
            ));
        }
        if !self.failure_error.is_finite() || self.failure_error < 0.0 {
            return Err(PushfitError::Configuration(
                "Failure error must be a finite, non-negative number".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Problem".to_string(),
            fields: vec![
                FieldManifest {
                    name: "kind".to_string(),
                    field_type: "enum".to_string(),
                    default: serde_json::json!("IntegerRegression"),
                    min: None,
                    max: None,
                    description: "IntegerRegression or FloatRegression".to_string(),
                },
                FieldManifest {
                    name: "test_cases".to_string(),
                    field_type: "string".to_string(),
                    default: serde_json::json!(""),
                    min: None,
                    max: None,
                    description: "Fitness cases as a nested list of (input output) pairs".to_string(),
                },
                FieldManifest {
                    name: "execution_limit".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(DEFAULT_EXECUTION_LIMIT),
                    min: Some(1.0),
                    max: None,
                    description: "Instruction budget per fitness case".to_string(),
                },
                FieldManifest {
                    name: "failure_error".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(DEFAULT_FAILURE_ERROR),
                    min: Some(0.0),
                    max: None,
                    description: "Error used when a candidate leaves no finite result".to_string(),
                },
            ],
        }
    }
}
