use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerdigrisError {
    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Genome error: {0}")]
    Genome(String),

    #[error("Block mismatch on line {line}: `end {found}` cannot close {expected}")]
    BlockMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, VerdigrisError>;
