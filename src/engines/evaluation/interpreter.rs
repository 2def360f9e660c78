use crate::engines::evaluation::input::{InputSource, StdinSource};
use crate::engines::evaluation::statement::{Runtime, Statement, StatementKind};
use crate::error::{Result, VerdigrisError};
use crate::types::Value;
use std::collections::{HashMap, VecDeque};

/// A line that did not form a valid statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub text: String,
}

/// What a successful parse produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub statements: usize,
    pub syntax_errors: Vec<SyntaxError>,
}

/// Parses line-delimited program text into a statement tree and runs it.
pub struct Interpreter {
    program: Vec<Statement>,
    symbols: HashMap<String, Value>,
    inputs: Box<dyn InputSource>,
    outputs: Vec<Value>,
}

impl Interpreter {
    /// Inputs come from the given queue, or from standard input when `None`.
    pub fn new(inputs: Option<Vec<Value>>) -> Self {
        let source: Box<dyn InputSource> = match inputs {
            Some(values) => Box::new(VecDeque::from(values)),
            None => Box::new(StdinSource),
        };
        Self::with_source(source)
    }

    pub fn with_source(inputs: Box<dyn InputSource>) -> Self {
        Self {
            program: Vec::new(),
            symbols: HashMap::new(),
            inputs,
            outputs: Vec::new(),
        }
    }

    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    pub fn program(&self) -> &[Statement] {
        &self.program
    }

    pub fn symbols(&self) -> &HashMap<String, Value> {
        &self.symbols
    }

    /// Parse `text` one line at a time.
    ///
    /// Invalid lines are reported and skipped. Blocks are tracked on an
    /// explicit stack and attached to their parent once closed, so a block
    /// only reaches the tree when it was valid. An `end` that does not match
    /// the innermost open block aborts the parse; whatever was attached
    /// before that point stays in the program.
    pub fn parse(&mut self, text: &str) -> Result<ParseSummary> {
        let mut nesting: Vec<Statement> = Vec::new();
        let mut summary = ParseSummary::default();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let number = idx + 1;
            let statement = Statement::parse(line);

            if !statement.is_valid() {
                log::debug!("Syntax error on line #{}\n\t{}", number, statement.text());
                summary.syntax_errors.push(SyntaxError {
                    line: number,
                    text: statement.text().to_string(),
                });
            }

            match statement.kind() {
                StatementKind::Comment => {}
                StatementKind::Define => {
                    if statement.is_valid() {
                        for name in statement.declared() {
                            self.symbols.insert(name.clone(), 0);
                        }
                    }
                }
                StatementKind::End => {
                    let Some(closes) = statement.closes() else {
                        continue;
                    };
                    let Some(open) = nesting.pop() else {
                        log::warn!("Unbalanced `{}` on line #{}", statement.text(), number);
                        return Err(VerdigrisError::BlockMismatch {
                            line: number,
                            expected: "nothing".to_string(),
                            found: closes.keyword().to_string(),
                        });
                    };
                    if open.kind() != closes {
                        log::warn!("Mismatched `{}` on line #{}", statement.text(), number);
                        return Err(VerdigrisError::BlockMismatch {
                            line: number,
                            expected: format!("{} block", open.kind().keyword()),
                            found: closes.keyword().to_string(),
                        });
                    }
                    summary.statements += self.attach(open, &mut nesting);
                }
                kind if kind.is_block() => nesting.push(statement),
                _ => summary.statements += self.attach(statement, &mut nesting),
            }
        }

        while let Some(open) = nesting.pop() {
            log::warn!("Unclosed `{}` closed at end of program", open.text());
            summary.statements += self.attach(open, &mut nesting);
        }

        Ok(summary)
    }

    /// Place a finished statement under the innermost open block, or at top level.
    fn attach(&mut self, statement: Statement, nesting: &mut [Statement]) -> usize {
        if !statement.is_valid() {
            return 0;
        }
        match nesting.last_mut() {
            Some(parent) => parent.nest(statement),
            None => self.program.push(statement),
        }
        1
    }

    /// Run the program from the top, clearing earlier outputs.
    ///
    /// Returns false if any statement failed; every statement still runs.
    /// `loop_budget` caps loop iterations across the whole run, nested loops
    /// included.
    pub fn go(&mut self, loop_budget: Option<usize>) -> bool {
        self.outputs.clear();

        let mut runtime = Runtime {
            symbols: &mut self.symbols,
            inputs: &mut *self.inputs,
            outputs: &mut self.outputs,
            remaining_iterations: loop_budget,
        };

        self.program
            .iter()
            .fold(true, |ok, statement| statement.execute(&mut runtime) && ok)
    }
}
