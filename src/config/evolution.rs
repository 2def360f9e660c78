use super::traits::ConfigSection;
use crate::error::VerdigrisError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Slots breeding leaves empty for fresh individuals.
    pub headroom: usize,
    pub max_generations: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            headroom: 10,
            max_generations: 200,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), VerdigrisError> {
        if self.population_size < 2 {
            return Err(VerdigrisError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.headroom >= self.population_size {
            return Err(VerdigrisError::Configuration(
                "Headroom must be smaller than the population size".to_string()
            ));
        }
        if self.max_generations == 0 {
            return Err(VerdigrisError::Configuration(
                "At least one generation is required".to_string()
            ));
        }
        Ok(())
    }
}
