use crate::engines::generation::chromosome::{Axis, Chromosome};
use crate::error::{Result, VerdigrisError};
use crate::types::Gene;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// All decision logs of one individual, plus the random source that extends them.
///
/// Every pseudo-random choice a grammar makes goes through [`GeneBank::next`],
/// which replays recorded genes first and only then draws fresh ones. Loading a
/// saved genome therefore reproduces the program it came from, and a mated
/// gene bank regrows whatever its parents' logs do not cover.
#[derive(Debug, Clone)]
pub struct GeneBank {
    chromosomes: [Chromosome; 4],
    rng: StdRng,
}

impl Default for GeneBank {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneBank {
    /// Empty gene bank seeded from entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty gene bank with a deterministic random source.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            chromosomes: Default::default(),
            rng,
        }
    }

    /// Strictly parse a four-line genome. Missing lines load as empty axes.
    pub fn from_text(text: &str, seed: Option<u64>) -> Result<Self> {
        let mut bank = match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        };
        let mut lines = text.lines();

        for axis in Axis::ALL {
            let line = lines.next().unwrap_or("");
            let genes = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<Gene>().map_err(|e| {
                        VerdigrisError::Genome(format!(
                            "invalid gene `{}` on {} axis: {}",
                            token, axis, e
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            bank.load(axis, genes);
        }

        Ok(bank)
    }

    /// Leniently load a four-line genome, skipping tokens that are not genes.
    ///
    /// Returns the number of lines in the input text.
    pub fn load_text(&mut self, text: &str) -> usize {
        let lines: Vec<&str> = text.lines().collect();

        for (idx, axis) in Axis::ALL.into_iter().enumerate() {
            let line = lines.get(idx).copied().unwrap_or("");
            let genes = line
                .split_whitespace()
                .filter_map(|token| match token.parse::<Gene>() {
                    Ok(gene) => Some(gene),
                    Err(_) => {
                        log::warn!("Skipping invalid gene `{}` on {} axis", token, axis);
                        None
                    }
                })
                .collect();
            self.load(axis, genes);
        }

        lines.len()
    }

    /// Replace one axis's log and rewind it.
    pub fn load(&mut self, axis: Axis, genes: Vec<Gene>) {
        self.chromosomes[axis.index()].load(genes);
    }

    pub fn next(&mut self, axis: Axis) -> Gene {
        let Self { chromosomes, rng } = self;
        chromosomes[axis.index()].next(rng)
    }

    pub fn next_bounded(&mut self, axis: Axis, max: usize) -> usize {
        let Self { chromosomes, rng } = self;
        chromosomes[axis.index()].next_bounded(max, rng)
    }

    pub fn chromosome(&self, axis: Axis) -> &Chromosome {
        &self.chromosomes[axis.index()]
    }

    /// Rewind every axis so the recorded decisions replay from the start.
    pub fn rewind(&mut self) {
        for chromosome in &mut self.chromosomes {
            chromosome.rewind();
        }
    }

    pub fn is_changed(&self) -> bool {
        self.chromosomes.iter().any(Chromosome::is_changed)
    }

    /// One line of space-delimited genes per axis, in [`Axis::ALL`] order.
    pub fn serialize(&self) -> String {
        Axis::ALL
            .iter()
            .map(|axis| self.chromosome(*axis).dump())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Recombine two parents' decision histories axis by axis.
    ///
    /// Walks both logs with independent cursors; each step either copies a gene
    /// from one parent or skips one, chosen uniformly. Stops as soon as either
    /// parent runs out on that axis. Each parent's genes keep their order in the
    /// child, and a child axis holds at most `len(a) + len(b) - 1` genes. The
    /// child gets its own random source seeded from `rng`.
    pub fn mate<R: Rng>(&self, other: &GeneBank, rng: &mut R) -> GeneBank {
        let mut child = GeneBank::seeded(rng.gen());

        for axis in Axis::ALL {
            let mine = self.chromosome(axis).genes();
            let theirs = other.chromosome(axis).genes();
            child.load(axis, crossover_axis(mine, theirs, rng));
        }

        child
    }
}

fn crossover_axis<R: Rng>(mine: &[Gene], theirs: &[Gene], rng: &mut R) -> Vec<Gene> {
    let mut child = Vec::with_capacity(mine.len().min(theirs.len()));
    let mut i = 0;
    let mut j = 0;

    while i < mine.len() && j < theirs.len() {
        match rng.gen_range(0..4) {
            0 => {
                child.push(mine[i]);
                i += 1;
            }
            1 => {
                child.push(theirs[j]);
                j += 1;
            }
            2 => i += 1,
            _ => j += 1,
        }
    }

    child
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_fixed_axis_order() {
        let mut bank = GeneBank::seeded(3);
        bank.load(Axis::Number, vec![1, 2, 3]);
        bank.load(Axis::Production, vec![9]);

        assert_eq!(bank.serialize(), "1 2 3\n\n\n9");
    }

    #[test]
    fn test_from_text_rejects_garbage() {
        let err = GeneBank::from_text("1 2\nx\n\n", Some(1)).unwrap_err();
        assert!(matches!(err, VerdigrisError::Genome(_)));
    }

    #[test]
    fn test_load_text_skips_garbage() {
        let mut bank = GeneBank::seeded(1);
        let lines = bank.load_text("5 nope 6\n7\n");

        assert_eq!(lines, 2);
        assert_eq!(bank.chromosome(Axis::Number).genes(), &[5, 6]);
        assert_eq!(bank.chromosome(Axis::Variable).genes(), &[7]);
        assert!(bank.chromosome(Axis::Production).is_empty());
    }

    #[test]
    fn test_mate_with_empty_parent_is_empty() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut full = GeneBank::seeded(1);
        for axis in Axis::ALL {
            full.load(axis, vec![1, 2, 3, 4]);
        }
        let empty = GeneBank::seeded(2);

        let child = full.mate(&empty, &mut rng);
        for axis in Axis::ALL {
            assert!(child.chromosome(axis).is_empty());
        }
    }

    #[test]
    fn test_mate_keeps_parent_order_within_combined_length() {
        let mut a = GeneBank::seeded(1);
        let mut b = GeneBank::seeded(2);
        a.load(Axis::Production, vec![1, 2, 3, 4, 5, 6]);
        b.load(Axis::Production, vec![11, 12, 13, 14, 15, 16, 17, 18]);

        for seed in 0..32 {
            let child = a.mate(&b, &mut StdRng::seed_from_u64(seed));
            let genes = child.chromosome(Axis::Production).genes();
            assert!(genes.len() <= 6 + 8 - 1);

            let from_a: Vec<Gene> = genes.iter().copied().filter(|g| *g <= 6).collect();
            let from_b: Vec<Gene> = genes.iter().copied().filter(|g| *g > 10).collect();
            assert_eq!(from_a.len() + from_b.len(), genes.len());
            assert!(from_a.windows(2).all(|w| w[0] < w[1]));
            assert!(from_b.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_mate_can_outgrow_shorter_parent() {
        let mut a = GeneBank::seeded(1);
        let mut b = GeneBank::seeded(2);
        a.load(Axis::Number, vec![1]);
        b.load(Axis::Number, vec![2, 2, 2, 2]);

        let longest = (0..256)
            .map(|seed| a.mate(&b, &mut StdRng::seed_from_u64(seed)).chromosome(Axis::Number).len())
            .max()
            .unwrap_or(0);
        assert!(longest > 1);
        assert!(longest <= 4);
    }

    #[test]
    fn test_seeded_banks_draw_identically() {
        let mut a = GeneBank::seeded(42);
        let mut b = GeneBank::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next(Axis::Number), b.next(Axis::Number));
        }
        assert!(a.is_changed());
    }
}
