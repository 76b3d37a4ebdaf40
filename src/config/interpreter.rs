use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::execution::interpreter::DEFAULT_MAX_POINTS_IN_PROGRAM;
use crate::error::PushfitError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Instruction names enabled for random code generation.
    pub instructions: Vec<String>,
    pub max_points_in_program: usize,
    pub max_random_code_size: usize,
    pub min_random_int: i64,
    pub max_random_int: i64,
    pub random_int_resolution: i64,
    pub min_random_float: f64,
    pub max_random_float: f64,
    pub random_float_resolution: f64,
    /// Candidates generated by the driver when no program is given.
    pub population_size: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            instructions: vec![
                "registered.integer".to_string(),
                "registered.exec".to_string(),
                "input.index".to_string(),
                "input.inall".to_string(),
            ],
            max_points_in_program: DEFAULT_MAX_POINTS_IN_PROGRAM,
            max_random_code_size: 40,
            min_random_int: -10,
            max_random_int: 10,
            random_int_resolution: 1,
            min_random_float: -10.0,
            max_random_float: 10.0,
            random_float_resolution: 0.01,
            population_size: 20,
        }
    }
}

impl ConfigSection for InterpreterConfig {
    fn section_name() -> &'static str {
        "interpreter"
    }

    fn validate(&self) -> Result<(), PushfitError> {
        if self.min_random_int > self.max_random_int {
            return Err(PushfitError::Configuration(
                "min_random_int must not exceed max_random_int".to_string()
            ));
        }
        if self.min_random_float > self.max_random_float {
            return Err(PushfitError::Configuration(
                "min_random_float must not exceed max_random_float".to_string()
            ));
        }
        if self.random_int_resolution < 1 {
            return Err(PushfitError::Configuration(
                "random_int_resolution must be at least 1".to_string()
            ));
        }
        if self.max_points_in_program == 0 {
            return Err(PushfitError::Configuration(
                "max_points_in_program must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Interpreter".to_string(),
            fields: vec![
                FieldManifest {
                    name: "instructions".to_string(),
                    field_type: "list".to_string(),
                    default: serde_json::json!(Self::default().instructions),
                    min: None,
                    max: None,
                    description: "Instructions available to random code generation".to_string(),
                },
                FieldManifest {
                    name: "max_points_in_program".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(DEFAULT_MAX_POINTS_IN_PROGRAM),
                    min: Some(1.0),
                    max: None,
                    description: "Largest list exec.s may build".to_string(),
                },
                FieldManifest {
                    name: "max_random_code_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(40),
                    min: Some(1.0),
                    max: None,
                    description: "Upper bound on random program size".to_string(),
                },
                FieldManifest {
                    name: "population_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(20),
                    min: Some(1.0),
                    max: None,
                    description: "Random candidates scored by the driver".to_string(),
                },
                FieldManifest {
                    name: "min_random_int".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(-10),
                    min: None,
                    max: None,
                    description: "Smallest integer constant".to_string(),
                },
                FieldManifest {
                    name: "max_random_int".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(10),
                    min: None,
                    max: None,
                    description: "Upper bound on integer constants".to_string(),
                },
                FieldManifest {
                    name: "random_int_resolution".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(1),
                    min: Some(1.0),
                    max: None,
                    description: "Step between integer constants".to_string(),
                },
                FieldManifest {
                    name: "min_random_float".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(-10.0),
                    min: None,
                    max: None,
                    description: "Smallest float constant".to_string(),
                },
                FieldManifest {
                    name: "max_random_float".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(10.0),
                    min: None,
                    max: None,
                    description: "Upper bound on float constants".to_string(),
                },
                FieldManifest {
                    name: "random_float_resolution".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(0.01),
                    min: Some(0.0),
                    max: None,
                    description: "Step between float constants".to_string(),
                },
            ],
        }
    }
}
