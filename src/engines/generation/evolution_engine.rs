use crate::config::EvolutionConfig;
use crate::engines::evaluation::fitness::PERFECT_RATING;
use crate::engines::evaluation::individual::{Blueprint, Individual};
use crate::engines::generation::gene_bank::GeneBank;
use crate::engines::generation::grammar::Grammar;
use crate::engines::generation::operators::{rank_by_rating, select_parent, truncate_below_threshold};
use crate::engines::generation::progress::ProgressCallback;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    MaxGenerations,
    Extinct,
    Perfect,
}

/// The best individual of a run, detached from its interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub program: String,
    pub rating: f64,
    pub genome: String,
}

impl From<&Individual> for Champion {
    fn from(individual: &Individual) -> Self {
        Self {
            program: individual.program().to_string(),
            rating: individual.rating(),
            genome: individual.genome(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub best: Option<Champion>,
    pub generations: usize,
    pub termination: Termination,
    /// Acceptance threshold set at the end of each completed generation.
    pub thresholds: Vec<f64>,
    /// Best rating at the end of each completed generation.
    pub best_ratings: Vec<f64>,
}

/// Drives generations of top-up, rank, truncate, ratchet and breed.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    blueprint: Blueprint,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, blueprint: Blueprint) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            blueprint,
            rng,
        }
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> EvolutionOutcome {
        let mut population: Vec<Individual> = Vec::with_capacity(self.config.population_size);
        let mut threshold = f64::MIN_POSITIVE;
        let mut outcome = EvolutionOutcome {
            best: None,
            generations: 0,
            termination: Termination::MaxGenerations,
            thresholds: Vec::new(),
            best_ratings: Vec::new(),
        };

        for generation in 0..self.config.max_generations {
            callback.on_generation_start(generation);
            outcome.generations = generation + 1;

            self.top_up(&mut population, threshold, callback);
            rank_by_rating(&mut population);
            let discarded = truncate_below_threshold(&mut population, threshold);
            log::debug!(
                "Generation {}: {} below threshold {:.4}",
                generation + 1,
                discarded,
                threshold
            );

            let Some(weakest) = population.last() else {
                log::warn!("Population went extinct in generation {}", generation + 1);
                outcome.best = None;
                outcome.termination = Termination::Extinct;
                break;
            };

            threshold = weakest.rating();
            let best = &population[0];
            outcome.thresholds.push(threshold);
            outcome.best_ratings.push(best.rating());
            outcome.best = Some(Champion::from(best));

            callback.on_generation_complete(generation, best.rating(), threshold, population.len());

            if best.rating() >= PERFECT_RATING {
                log::info!("Perfect program found in generation {}", generation + 1);
                outcome.termination = Termination::Perfect;
                break;
            }

            if generation + 1 < self.config.max_generations {
                self.breed(&mut population, threshold);
            }
        }

        outcome
    }

    /// Fill the population with brand new individuals.
    fn top_up<C: ProgressCallback>(&mut self, population: &mut Vec<Individual>, threshold: f64, callback: &mut C) {
        let needed = self.config.population_size.saturating_sub(population.len());
        let seeds: Vec<u64> = (0..needed).map(|_| self.rng.gen()).collect();

        let blueprint = &self.blueprint;
        let fresh: Vec<Individual> = seeds
            .into_par_iter()
            .map(|seed| blueprint.spawn(GeneBank::seeded(seed), threshold))
            .collect();

        for evaluated in 1..=fresh.len() {
            callback.on_individual_evaluated(evaluated, needed);
        }
        population.extend(fresh);
    }

    /// Mate random survivors until only the headroom is left free.
    fn breed(&mut self, population: &mut Vec<Individual>, threshold: f64) {
        let survivors = population.len();
        let target = self
            .config
            .population_size
            .saturating_sub(self.config.headroom);
        if survivors == 0 || survivors >= target {
            return;
        }

        let children: Vec<Grammar> = (survivors..target)
            .map(|_| {
                let mother = select_parent(survivors, &mut self.rng);
                let father = select_parent(survivors, &mut self.rng);
                population[mother]
                    .grammar()
                    .mate(population[father].grammar(), &mut self.rng)
            })
            .collect();

        let blueprint = &self.blueprint;
        let offspring: Vec<Individual> = children
            .into_par_iter()
            .map(|grammar| blueprint.instantiate(grammar, threshold))
            .collect();

        log::debug!("Bred {} children from {} survivors", offspring.len(), survivors);
        population.extend(offspring);
    }
}
