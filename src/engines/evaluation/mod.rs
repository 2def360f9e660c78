pub mod statement;
pub mod input;
pub mod interpreter;
pub mod fitness;
pub mod individual;

pub use statement::{LexicalElement, Statement, StatementKind};
pub use input::{InputSource, StdinSource};
pub use interpreter::{Interpreter, ParseSummary, SyntaxError};
pub use fitness::{evaluate, rate, PERFECT_RATING};
pub use individual::{Blueprint, Individual};
