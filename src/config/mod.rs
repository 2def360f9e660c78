pub mod traits;
pub mod evolution;
pub mod grammar;
pub mod execution;
pub mod problem;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use grammar::GrammarConfig;
pub use execution::ExecutionConfig;
pub use problem::ProblemConfig;
pub use traits::ConfigSection;
