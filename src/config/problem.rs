use super::traits::ConfigSection;
use crate::error::VerdigrisError;
use crate::types::{IoSpec, Value};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to evolve: the grammar to draw from and the behaviour to match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    pub grammar_path: PathBuf,
    /// Replay this genome once instead of evolving.
    pub genome_path: Option<PathBuf>,
    pub inputs: Vec<Value>,
    pub expected: Vec<Value>,
    /// Rating a single replayed program must reach to pass.
    pub threshold: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            grammar_path: PathBuf::from("grammars/arithmetic.bnf"),
            genome_path: None,
            inputs: vec![720],
            expected: vec![2, 2, 2, 2, 3, 3, 5],
            threshold: 90.0,
        }
    }
}

impl ProblemConfig {
    pub fn io_spec(&self) -> IoSpec {
        IoSpec::new(self.inputs.clone(), self.expected.clone())
    }
}

impl ConfigSection for ProblemConfig {
    fn section_name() -> &'static str {
        "problem"
    }

    fn validate(&self) -> Result<(), VerdigrisError> {
        if self.grammar_path.as_os_str().is_empty() {
            return Err(VerdigrisError::Configuration(
                "A grammar path is required".to_string()
            ));
        }
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(VerdigrisError::Configuration(
                "Threshold must be between 0 and 100".to_string()
            ));
        }
        Ok(())
    }
}
