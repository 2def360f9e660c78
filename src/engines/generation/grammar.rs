use crate::engines::generation::chromosome::Axis;
use crate::engines::generation::gene_bank::GeneBank;
use crate::engines::generation::production::{Alternative, ProductionTable};
use rand::Rng;
use std::sync::Arc;

/// Returned by `@Initialized` (and `@Variable`) when there is nothing to pick.
pub const NO_VARIABLE: &str = "novariable";

/// Terminal that ends a statement and commits pending initializations.
pub const STATEMENT_END: &str = ";";

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A variable declared while generating one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub initialized: bool,
    pub pending_initialize: bool,
}

impl Variable {
    pub fn new(name: String) -> Self {
        Self {
            name,
            initialized: false,
            pending_initialize: false,
        }
    }

    fn commit(&mut self) {
        if self.pending_initialize {
            self.initialized = true;
            self.pending_initialize = false;
        }
    }
}

/// Special non-terminals handled by the grammar itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Declare,
    Variable,
    Initialized,
    Number,
}

impl Directive {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "@Declare" => Some(Directive::Declare),
            "@Variable" => Some(Directive::Variable),
            "@Initialized" => Some(Directive::Initialized),
            "@Number" => Some(Directive::Number),
            _ => None,
        }
    }
}

/// Expands grammar text into program text, drawing every choice from its gene bank.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Arc<ProductionTable>,
    symbols: Vec<Variable>,
    genes: GeneBank,
    max_depth: usize,
}

impl Grammar {
    pub fn new(productions: Arc<ProductionTable>, genes: GeneBank) -> Self {
        Self {
            productions,
            symbols: Vec::new(),
            genes,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(Arc::new(ProductionTable::parse(text)), GeneBank::new())
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse more productions into this grammar's table.
    pub fn add_production(&mut self, text: &str) -> usize {
        Arc::make_mut(&mut self.productions).add(text)
    }

    /// Load a saved four-line genome, replacing every axis.
    pub fn replace_chromosomes(&mut self, text: &str) -> usize {
        self.genes.load_text(text)
    }

    pub fn productions(&self) -> &Arc<ProductionTable> {
        &self.productions
    }

    pub fn gene_bank(&self) -> &GeneBank {
        &self.genes
    }

    pub fn symbols(&self) -> &[Variable] {
        &self.symbols
    }

    pub fn dump_chromosomes(&self) -> String {
        self.genes.serialize()
    }

    /// Generate a whole program from `start`, replaying the genome from its first gene.
    pub fn generate(&mut self, start: &str) -> String {
        self.symbols.clear();
        self.genes.rewind();
        self.fill(start)
    }

    /// Resolve one non-terminal or directive to its (unexpanded) replacement text.
    pub fn choose(&mut self, key: &str) -> String {
        if let Some(directive) = Directive::parse(key) {
            return self.resolve_directive(directive);
        }

        let Some(alternatives) = self.productions.get(key) else {
            log::warn!("Key {} not found.", key);
            return String::new();
        };

        let any_initialized = self.any_initialized();
        let options: Vec<&Alternative> = alternatives
            .iter()
            .filter(|alt| any_initialized || !alt.requires_initialized)
            .collect();

        if options.is_empty() {
            log::debug!("No alternative available for {}", key);
            return String::new();
        }

        let which = self.genes.next_bounded(Axis::Production, options.len());
        options[which].expression.clone()
    }

    /// Expand every non-terminal in `text` until only terminals remain.
    pub fn fill(&mut self, text: &str) -> String {
        self.fill_at(text, 0)
    }

    fn fill_at(&mut self, text: &str, depth: usize) -> String {
        let mut parts: Vec<String> = Vec::new();

        for token in text.split_whitespace() {
            if is_terminal(token) {
                if token == STATEMENT_END {
                    self.commit_pending();
                }
                parts.push(token.to_string());
                continue;
            }

            if depth >= self.max_depth {
                log::warn!("Expansion depth {} reached at {}; dropping it", depth, token);
                continue;
            }

            let replacement = self.choose(token);
            let expanded = self.fill_at(&replacement, depth + 1);
            if !expanded.is_empty() {
                parts.push(expanded);
            }
        }

        parts.join(" ")
    }

    /// Child grammar over the same productions with recombined genes.
    pub fn mate<R: Rng>(&self, other: &Grammar, rng: &mut R) -> Grammar {
        Grammar {
            productions: Arc::clone(&self.productions),
            symbols: Vec::new(),
            genes: self.genes.mate(&other.genes, rng),
            max_depth: self.max_depth,
        }
    }

    fn resolve_directive(&mut self, directive: Directive) -> String {
        match directive {
            Directive::Declare => {
                let name = format!("v{}", self.symbols.len() + 1);
                self.symbols.push(Variable::new(name.clone()));
                name
            }
            Directive::Variable => {
                if self.symbols.is_empty() {
                    log::debug!("@Variable with no declared variables");
                    return NO_VARIABLE.to_string();
                }
                let which = self.genes.next_bounded(Axis::Variable, self.symbols.len());
                let variable = &mut self.symbols[which];
                variable.pending_initialize = true;
                variable.name.clone()
            }
            Directive::Initialized => {
                let initialized: Vec<usize> = self
                    .symbols
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.initialized)
                    .map(|(idx, _)| idx)
                    .collect();
                if initialized.is_empty() {
                    return NO_VARIABLE.to_string();
                }
                let which = self.genes.next_bounded(Axis::Initialized, initialized.len());
                self.symbols[initialized[which]].name.clone()
            }
            Directive::Number => self.genes.next(Axis::Number).to_string(),
        }
    }

    fn any_initialized(&self) -> bool {
        self.symbols.iter().any(|v| v.initialized)
    }

    fn commit_pending(&mut self) {
        for variable in &mut self.symbols {
            variable.commit();
        }
    }
}

fn is_terminal(token: &str) -> bool {
    token.to_lowercase() == token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar(text: &str, seed: u64) -> Grammar {
        Grammar::new(Arc::new(ProductionTable::parse(text)), GeneBank::seeded(seed))
    }

    #[test]
    fn test_declare_names_are_sequential() {
        let mut g = grammar("", 1);
        assert_eq!(g.choose("@Declare"), "v1");
        assert_eq!(g.choose("@Declare"), "v2");
        assert_eq!(g.symbols().len(), 2);
        assert!(g.symbols().iter().all(|v| !v.initialized));
    }

    #[test]
    fn test_initialized_sentinel_when_nothing_initialized() {
        let mut g = grammar("", 1);
        g.choose("@Declare");
        assert_eq!(g.choose("@Initialized"), NO_VARIABLE);
    }

    #[test]
    fn test_initialization_commits_at_statement_end() {
        let mut g = grammar("", 1);
        let text = g.fill("define @Declare ; input @Variable");

        assert_eq!(text, "define v1 ; input v1");
        assert!(g.symbols()[0].pending_initialize);
        assert!(!g.symbols()[0].initialized);

        g.fill(";");
        assert!(g.symbols()[0].initialized);
        assert_eq!(g.choose("@Initialized"), "v1");
    }

    #[test]
    fn test_requires_initialized_alternatives_are_filtered() {
        let mut g = grammar("Pick ::= output @Initialized #init | output 7", 9);
        for _ in 0..50 {
            assert_eq!(g.choose("Pick"), "output 7");
        }
    }

    #[test]
    fn test_unknown_key_expands_to_nothing() {
        let mut g = grammar("Program ::= output Missing", 1);
        assert_eq!(g.choose("Nope"), "");
        assert_eq!(g.fill("Program"), "output");
    }

    #[test]
    fn test_depth_guard_stops_runaway_recursion() {
        let mut g = grammar("Loop ::= x Loop", 1).with_max_depth(5);
        assert_eq!(g.fill("Loop"), "x x x x x");
    }

    #[test]
    fn test_genome_replays_the_same_program() {
        let text = "Program ::= Line ; Line ;\n\nLine ::= output @Number | output 1 | output 2";
        let mut first = grammar(text, 21);
        let program = first.generate("Program");

        let mut replay = grammar(text, 99);
        replay.replace_chromosomes(&first.dump_chromosomes());
        assert_eq!(replay.generate("Program"), program);
        assert!(!replay.gene_bank().is_changed());
    }

    #[test]
    fn test_add_production_extends_shared_table() {
        let mut g = grammar("A ::= a", 1);
        let sibling = g.clone();
        g.add_production("B ::= b");

        assert!(g.productions().contains("B"));
        assert!(!sibling.productions().contains("B"));
    }
}
