use super::traits::ConfigSection;
use crate::error::VerdigrisError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Iterations a loop may run each time it is entered. `None` means unbounded.
    pub loop_budget: Option<usize>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            loop_budget: Some(1000),
        }
    }
}

impl ConfigSection for ExecutionConfig {
    fn section_name() -> &'static str {
        "execution"
    }

    fn validate(&self) -> Result<(), VerdigrisError> {
        if self.loop_budget == Some(0) {
            return Err(VerdigrisError::Configuration(
                "Loop budget must be at least 1 when set".to_string()
            ));
        }
        Ok(())
    }
}
