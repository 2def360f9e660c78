pub mod chromosome;
pub mod gene_bank;
pub mod production;
pub mod grammar;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use chromosome::{Axis, Chromosome};
pub use gene_bank::GeneBank;
pub use production::{Alternative, ProductionTable};
pub use grammar::{Grammar, Variable, NO_VARIABLE};
pub use evolution_engine::{Champion, EvolutionEngine, EvolutionOutcome, Termination};
pub use progress::{ConsoleProgressCallback, ProgressCallback};
