use crate::engines::evaluation::individual::Individual;
use rand::Rng;
use std::cmp::Ordering;

/// Stable sort, best rating first. Equal ratings keep their current order.
pub fn rank_by_rating(population: &mut [Individual]) {
    population.sort_by(|a, b| {
        b.rating()
            .partial_cmp(&a.rating())
            .unwrap_or(Ordering::Equal)
    });
}

/// Drop the first individual rated below `threshold` and everything after it.
///
/// Returns how many were removed. Expects a ranked population.
pub fn truncate_below_threshold(population: &mut Vec<Individual>, threshold: f64) -> usize {
    let before = population.len();
    if let Some(cut) = population.iter().position(|ind| ind.rating() < threshold) {
        population.truncate(cut);
    }
    before - population.len()
}

/// Uniform parent choice, with replacement, among the first `survivors` individuals.
pub fn select_parent<R: Rng>(survivors: usize, rng: &mut R) -> usize {
    rng.gen_range(0..survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IoSpec;

    fn rated_with(rating: f64, output: i64) -> Individual {
        let grammar = format!("Program ::= output {} ;", output);
        let mut individual = Individual::from_text(&grammar, None, &IoSpec::default());
        individual.set_rating(rating);
        individual
    }

    fn rated(rating: f64) -> Individual {
        rated_with(rating, 1)
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut population = vec![
            rated_with(10.0, 1),
            rated_with(50.0, 2),
            rated_with(10.0, 3),
            rated_with(90.0, 4),
        ];
        rank_by_rating(&mut population);

        let programs: Vec<&str> = population.iter().map(Individual::program).collect();
        assert_eq!(programs, vec!["output 4\n", "output 2\n", "output 1\n", "output 3\n"]);
    }

    #[test]
    fn test_truncation_is_prefix_closed() {
        let mut population = vec![rated(90.0), rated(40.0), rated(30.0), rated(60.0)];
        let removed = truncate_below_threshold(&mut population, 50.0);

        assert_eq!(removed, 3);
        assert_eq!(population.len(), 1);
    }

    #[test]
    fn test_truncation_keeps_everyone_above_threshold() {
        let mut population = vec![rated(90.0), rated(80.0)];
        assert_eq!(truncate_below_threshold(&mut population, 80.0), 0);
        assert_eq!(population.len(), 2);
    }
}
