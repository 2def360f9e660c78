use anyhow::{Context, Result};
use std::sync::Arc;
use verdigris::config::{AppConfig, ConfigManager};
use verdigris::engines::evaluation::{Blueprint, Individual};
use verdigris::engines::generation::{
    ConsoleProgressCallback, EvolutionEngine, Grammar, ProductionTable,
};

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = std::env::args().nth(1) {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?;
    }
    let config = manager.get();

    let grammar_text = std::fs::read_to_string(&config.problem.grammar_path).with_context(|| {
        format!("reading grammar {}", config.problem.grammar_path.display())
    })?;
    let productions = Arc::new(ProductionTable::parse(&grammar_text));
    if productions.is_empty() {
        anyhow::bail!("grammar {} has no productions", config.problem.grammar_path.display());
    }

    let mut blueprint = Blueprint::new(productions, config.problem.io_spec());
    blueprint.start_symbol = config.grammar.start_symbol.clone();
    blueprint.max_depth = config.grammar.max_depth;
    blueprint.loop_budget = config.execution.loop_budget;

    match &config.problem.genome_path {
        Some(path) => {
            let genome = std::fs::read_to_string(path)
                .with_context(|| format!("reading genome {}", path.display()))?;
            replay(&blueprint, &genome, &config);
        }
        None => evolve(blueprint, &config)?,
    }

    Ok(())
}

fn replay(blueprint: &Blueprint, genome: &str, config: &AppConfig) {
    let mut grammar: Grammar = blueprint.grammar(Default::default());
    grammar.replace_chromosomes(genome);

    let mut individual = Individual::new(
        grammar,
        &blueprint.spec,
        &blueprint.start_symbol,
        blueprint.loop_budget,
    );
    let evaluation = individual.evaluate(config.problem.threshold);

    println!("{}", individual.program());
    println!("{}: {}%", evaluation.passed, evaluation.rating);
}

fn evolve(blueprint: Blueprint, config: &AppConfig) -> Result<()> {
    let mut engine = EvolutionEngine::new(config.evolution.clone(), blueprint);
    let outcome = engine.run(&mut ConsoleProgressCallback);

    match &outcome.best {
        Some(champion) => {
            println!("{}", champion.program);
            println!(
                "{:?} after {} generations: {}%",
                outcome.termination, outcome.generations, champion.rating
            );
        }
        None => println!("No surviving program ({:?})", outcome.termination),
    }

    log::debug!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
