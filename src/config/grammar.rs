use super::traits::ConfigSection;
use crate::engines::generation::grammar::DEFAULT_MAX_DEPTH;
use crate::engines::evaluation::individual::DEFAULT_START_SYMBOL;
use crate::error::VerdigrisError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub start_symbol: String,
    /// Deepest non-terminal nesting `fill` expands before giving up on a branch.
    pub max_depth: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            start_symbol: DEFAULT_START_SYMBOL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConfigSection for GrammarConfig {
    fn section_name() -> &'static str {
        "grammar"
    }

    fn validate(&self) -> Result<(), VerdigrisError> {
        if self.start_symbol.trim().is_empty() {
            return Err(VerdigrisError::Configuration(
                "Start symbol must not be empty".to_string()
            ));
        }
        if self.max_depth == 0 {
            return Err(VerdigrisError::Configuration(
                "Maximum expansion depth must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
