use super::{
    interpreter::InterpreterConfig,
    prediction::PredictionConfig,
    problem::ProblemConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::PushfitError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `PUSHFIT__PROBLEM__EXECUTION_LIMIT=500`.
pub const ENV_PREFIX: &str = "PUSHFIT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub problem: ProblemConfig,
    pub prediction: PredictionConfig,
    pub interpreter: InterpreterConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PushfitError> {
        validate_section(&self.problem)?;
        validate_section(&self.prediction)?;
        validate_section(&self.interpreter)?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PushfitError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| PushfitError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.problem.to_manifest(),
            self.prediction.to_manifest(),
            self.interpreter.to_manifest(),
        ]
    }

    pub fn manifests_json(&self) -> Result<String, PushfitError> {
        Ok(serde_json::to_string_pretty(&self.manifests())?)
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), PushfitError> {
    section.validate().map_err(|e| match e {
        PushfitError::Configuration(message) => {
            PushfitError::Configuration(format!("[{}] {}", S::section_name(), message))
        }
        other => other,
    })
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PushfitError> {
        let contents = std::fs::read_to_string(path)?;

        let config = AppConfig::from_toml_str(&contents)?;
        self.replace(config)
    }

    /// Loads `path` and applies `PUSHFIT__SECTION__KEY` environment overrides on top.
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), PushfitError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|layered| layered.try_deserialize())
            .map_err(|e| PushfitError::Configuration(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PushfitError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| PushfitError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, PushfitError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| PushfitError::Configuration("Config lock poisoned".to_string()))
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), PushfitError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        candidate.validate()?;
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), PushfitError> {
        let mut guard = self
            .config
            .write()
            .map_err(|_| PushfitError::Configuration("Config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProblemKind;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prediction.sample_size, 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [problem]
            kind = "FloatRegression"
            test_cases = "[[1.0 2.0]]"
            "#,
        )
        .unwrap();
        assert_eq!(config.problem.kind, ProblemKind::FloatRegression);
        assert_eq!(config.problem.execution_limit, 150);
        assert_eq!(config.prediction.sample_size, 8);
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        match AppConfig::from_toml_str("[prediction]\nsample_size = 0\n") {
            Err(PushfitError::Configuration(message)) => assert!(message.starts_with("[prediction]")),
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let manager = ConfigManager::new();
        let result = manager.load_from_file("/nonexistent/pushfit.toml");
        assert!(matches!(result, Err(PushfitError::Io(_))));
    }

    #[test]
    fn test_manifests_describe_every_section() {
        let json = AppConfig::default().manifests_json().unwrap();
        assert!(json.contains("\"sample_size\""));
        assert!(json.contains("\"execution_limit\""));
        assert!(json.contains("\"max_points_in_program\""));
        for field in [
            "min_random_int",
            "max_random_int",
            "random_int_resolution",
            "min_random_float",
            "max_random_float",
            "random_float_resolution",
        ] {
            assert!(json.contains(&format!("\"{}\"", field)), "missing {}", field);
        }
    }

    #[test]
    fn test_update_rolls_back_invalid_change() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.problem.execution_limit = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().problem.execution_limit, 150);

        manager.update(|c| c.problem.execution_limit = 500).unwrap();
        assert_eq!(manager.get().unwrap().problem.execution_limit, 500);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("pushfit-config-{}.toml", std::process::id()));
        let manager = ConfigManager::new();
        manager.update(|c| c.prediction.sample_size = 5).unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().unwrap().prediction.sample_size, 5);

        let layered = ConfigManager::new();
        layered.load_layered(&path).unwrap();
        assert_eq!(layered.get().unwrap().prediction.sample_size, 5);

        let _ = std::fs::remove_file(path);
    }
}
