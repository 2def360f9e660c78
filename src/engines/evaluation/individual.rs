use crate::engines::evaluation::fitness;
use crate::engines::evaluation::interpreter::{Interpreter, ParseSummary};
use crate::engines::generation::gene_bank::GeneBank;
use crate::engines::generation::grammar::{Grammar, DEFAULT_MAX_DEPTH};
use crate::engines::generation::production::ProductionTable;
use crate::error::Result;
use crate::types::{Evaluation, IoSpec, Value};
use std::sync::Arc;

pub const DEFAULT_START_SYMBOL: &str = "Program";

/// Turn generated text, where statements end in ` ;`, into one statement per line.
pub fn to_listing(generated: &str) -> String {
    generated.replace(" ;", "\n").replace("\n ", "\n")
}

/// One candidate: its grammar (and genes), the program they produced, and its rating.
pub struct Individual {
    grammar: Grammar,
    program: String,
    interpreter: Interpreter,
    parsed: Result<ParseSummary>,
    expected: Vec<Value>,
    loop_budget: Option<usize>,
    rating: f64,
    executed: bool,
    succeeded: bool,
}

impl Individual {
    /// Generate a program from `grammar` and parse it against `spec`.
    pub fn new(mut grammar: Grammar, spec: &IoSpec, start: &str, loop_budget: Option<usize>) -> Self {
        let program = to_listing(&grammar.generate(start));
        let mut interpreter = Interpreter::new(Some(spec.inputs.clone()));
        let parsed = interpreter.parse(&program);

        if let Err(e) = &parsed {
            log::debug!("Generated program failed to parse: {}", e);
        }

        Self {
            grammar,
            program,
            interpreter,
            parsed,
            expected: spec.expected.clone(),
            loop_budget,
            rating: 0.0,
            executed: false,
            succeeded: false,
        }
    }

    /// Build from grammar source, optionally replaying a saved genome.
    pub fn from_text(grammar_text: &str, genome: Option<&str>, spec: &IoSpec) -> Self {
        let mut grammar = Grammar::from_text(grammar_text);
        if let Some(genome) = genome.filter(|g| !g.trim().is_empty()) {
            grammar.replace_chromosomes(genome);
        }
        Self::new(grammar, spec, DEFAULT_START_SYMBOL, None)
    }

    pub fn execute(&mut self) -> bool {
        self.succeeded = self.interpreter.go(self.loop_budget);
        self.executed = true;
        self.succeeded
    }

    /// Rate against this individual's own expected outputs.
    pub fn evaluate(&mut self, threshold: f64) -> Evaluation {
        let expected = std::mem::take(&mut self.expected);
        let evaluation = fitness::evaluate(self, &expected, threshold);
        self.expected = expected;
        evaluation
    }

    pub(crate) fn set_rating(&mut self, rating: f64) {
        self.rating = rating;
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Whether every statement succeeded on the last run.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Whether the program text parsed without a block mismatch.
    pub fn parsed(&self) -> bool {
        self.parsed.is_ok()
    }

    pub fn parse_summary(&self) -> Option<&ParseSummary> {
        self.parsed.as_ref().ok()
    }

    /// Generated program, one statement per line.
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn outputs(&self) -> &[Value] {
        self.interpreter.outputs()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn genome(&self) -> String {
        self.grammar.dump_chromosomes()
    }
}

/// Everything shared by the individuals of one run.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub productions: Arc<ProductionTable>,
    pub spec: IoSpec,
    pub start_symbol: String,
    pub max_depth: usize,
    pub loop_budget: Option<usize>,
}

impl Blueprint {
    pub fn new(productions: Arc<ProductionTable>, spec: IoSpec) -> Self {
        Self {
            productions,
            spec,
            start_symbol: DEFAULT_START_SYMBOL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            loop_budget: None,
        }
    }

    pub fn grammar(&self, genes: GeneBank) -> Grammar {
        Grammar::new(Arc::clone(&self.productions), genes).with_max_depth(self.max_depth)
    }

    /// Generate, run and rate an individual from `grammar`.
    pub fn instantiate(&self, grammar: Grammar, threshold: f64) -> Individual {
        let mut individual = Individual::new(grammar, &self.spec, &self.start_symbol, self.loop_budget);
        individual.evaluate(threshold);
        individual
    }

    pub fn spawn(&self, genes: GeneBank, threshold: f64) -> Individual {
        self.instantiate(self.grammar(genes), threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTDOWN: &str = "Program ::= define @Declare ; input @Variable ; Body output 0 ;\n\n\
        Body ::= while ( @Initialized > 0 ) ; let @Variable <- @Initialized - 1 ; end while ;";

    #[test]
    fn test_listing_splits_statements() {
        assert_eq!(
            to_listing("define v1 ; input v1 ; output v1 ;"),
            "define v1\ninput v1\noutput v1\n"
        );
    }

    #[test]
    fn test_generated_program_runs_and_rates() {
        let spec = IoSpec::new(vec![5], vec![0]);
        let mut individual = Individual::from_text(COUNTDOWN, None, &spec);

        assert_eq!(
            individual.program(),
            "define v1\ninput v1\nwhile ( v1 > 0 )\nlet v1 <- v1 - 1\nend while\noutput 0\n"
        );
        assert!(individual.parsed());

        let evaluation = individual.evaluate(90.0);
        assert!(individual.is_executed());
        assert!(individual.succeeded());
        assert!(evaluation.passed);
        assert_eq!(evaluation.rating, 100.0);
    }

    #[test]
    fn test_genome_round_trip_reproduces_program() {
        let spec = IoSpec::new(vec![3], vec![0]);
        let blueprint = Blueprint::new(Arc::new(ProductionTable::parse(COUNTDOWN)), spec.clone());
        let first = blueprint.spawn(GeneBank::seeded(8), 0.0);

        let replayed = Individual::from_text(COUNTDOWN, Some(&first.genome()), &spec);
        assert_eq!(replayed.program(), first.program());
    }
}
