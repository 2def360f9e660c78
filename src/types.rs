use serde::{Deserialize, Serialize};

/// Integer type of the interpreted language.
pub type Value = i64;

/// A single recorded decision.
pub type Gene = u32;

/// Inputs fed to a candidate program and the outputs it should produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoSpec {
    pub inputs: Vec<Value>,
    pub expected: Vec<Value>,
}

impl IoSpec {
    pub fn new(inputs: Vec<Value>, expected: Vec<Value>) -> Self {
        Self { inputs, expected }
    }
}

/// Outcome of rating one individual against its expected outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub passed: bool,
    pub rating: f64,
}
