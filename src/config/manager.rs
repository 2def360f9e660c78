use super::{
    evolution::EvolutionConfig,
    execution::ExecutionConfig,
    grammar::GrammarConfig,
    problem::ProblemConfig,
    traits::ConfigSection,
};
use crate::error::VerdigrisError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `VERDIGRIS__EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "VERDIGRIS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub grammar: GrammarConfig,
    pub execution: ExecutionConfig,
    pub problem: ProblemConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), VerdigrisError> {
        self.evolution.validate()?;
        self.grammar.validate()?;
        self.execution.validate()?;
        self.problem.validate()?;
        Ok(())
    }
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

    /// Load a TOML (or JSON) file, then apply `VERDIGRIS__SECTION__FIELD` overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), VerdigrisError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        *self.write_lock() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), VerdigrisError> {
        let toml_str = toml::to_string_pretty(&self.get())?;

        std::fs::write(path, toml_str)
            .map_err(|e| VerdigrisError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), VerdigrisError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.write_lock() = candidate;
        Ok(())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, AppConfig> {
        match self.config.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.headroom = c.evolution.population_size);

        assert!(matches!(result, Err(VerdigrisError::Configuration(_))));
        assert_eq!(manager.get().evolution.headroom, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[evolution]\npopulation_size = 40\nseed = 3\n\n[problem]\ninputs = [5]\nexpected = [0]").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(file.path()).unwrap();
        let config = manager.get();

        assert_eq!(config.evolution.population_size, 40);
        assert_eq!(config.evolution.seed, Some(3));
        assert_eq!(config.evolution.max_generations, 200);
        assert_eq!(config.problem.expected, vec![0]);
        assert_eq!(config.grammar.start_symbol, "Program");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdigris.toml");

        let manager = ConfigManager::new();
        manager.update(|c| c.execution.loop_budget = Some(25)).unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().execution.loop_budget, Some(25));
    }
}
