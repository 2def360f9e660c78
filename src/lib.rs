pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{Result, VerdigrisError};
pub use types::{Evaluation, Gene, IoSpec, Value};
