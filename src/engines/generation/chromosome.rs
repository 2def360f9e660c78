use crate::types::Gene;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value a freshly drawn gene can take.
pub const GENE_CEILING: Gene = i32::MAX as Gene;

/// The four decision categories a grammar draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Number,
    Variable,
    Initialized,
    Production,
}

impl Axis {
    /// Fixed order used for serialization and genome loading.
    pub const ALL: [Axis; 4] = [
        Axis::Number,
        Axis::Variable,
        Axis::Initialized,
        Axis::Production,
    ];

    pub fn index(self) -> usize {
        match self {
            Axis::Number => 0,
            Axis::Variable => 1,
            Axis::Initialized => 2,
            Axis::Production => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Number => "Number",
            Axis::Variable => "Variable",
            Axis::Initialized => "Initialized",
            Axis::Production => "Production",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Replayable decision log for one axis.
///
/// Genes before the cursor have already been handed out. Reading past the
/// end appends a fresh gene, so the log only ever grows at its tail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    genes: Vec<Gene>,
    #[serde(skip)]
    cursor: usize,
    #[serde(skip)]
    changed: bool,
}

impl Chromosome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            cursor: 0,
            changed: false,
        }
    }

    /// Replace the log wholesale and rewind.
    pub fn load(&mut self, genes: Vec<Gene>) {
        self.genes = genes;
        self.cursor = 0;
        self.changed = false;
    }

    /// Replay the gene under the cursor, or draw and record a fresh one.
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> Gene {
        if self.cursor >= self.genes.len() {
            let fresh = rng.gen_range(0..=GENE_CEILING);
            self.genes.push(fresh);
            self.changed = true;
        }

        let gene = self.genes[self.cursor];
        self.cursor += 1;
        gene
    }

    /// Consume a gene and map it to `0..max`. Returns 0 without consuming when `max` is 0.
    pub fn next_bounded<R: Rng>(&mut self, max: usize, rng: &mut R) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next(rng) as usize) % max
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether recorded genes remain before fresh draws begin.
    pub fn has_genes(&self) -> bool {
        self.cursor < self.genes.len()
    }

    /// Whether fresh genes were appended since the last load.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Space-delimited gene list.
    pub fn dump(&self) -> String {
        self.genes
            .iter()
            .map(|gene| gene.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_replay_then_grow() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut chromosome = Chromosome::from_genes(vec![4, 8, 15]);

        assert!(chromosome.has_genes());
        assert_eq!(chromosome.next(&mut rng), 4);
        assert_eq!(chromosome.next(&mut rng), 8);
        assert_eq!(chromosome.next(&mut rng), 15);
        assert!(!chromosome.is_changed());
        assert!(!chromosome.has_genes());

        let fresh = chromosome.next(&mut rng);
        assert!(fresh <= GENE_CEILING);
        assert_eq!(chromosome.len(), 4);
        assert_eq!(chromosome.genes()[3], fresh);
        assert!(chromosome.is_changed());
    }

    #[test]
    fn test_bounded_zero_does_not_consume() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chromosome = Chromosome::from_genes(vec![9]);

        assert_eq!(chromosome.next_bounded(0, &mut rng), 0);
        assert_eq!(chromosome.position(), 0);
        assert_eq!(chromosome.next_bounded(4, &mut rng), 1);
    }

    #[test]
    fn test_load_resets_cursor() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chromosome = Chromosome::from_genes(vec![1, 2]);
        chromosome.next(&mut rng);
        chromosome.load(vec![30, 31]);

        assert_eq!(chromosome.position(), 0);
        assert_eq!(chromosome.next(&mut rng), 30);
        assert_eq!(chromosome.dump(), "30 31");
    }
}
