/// Hooks the evolution engine calls while it runs.
pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_rating: f64, threshold: f64, survivors: usize);
    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize);
}

/// Reports progress through the `log` facade.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_rating: f64, threshold: f64, survivors: usize) {
        log::info!(
            "Generation {} complete. Best rating: {:.4}, threshold: {:.4}, survivors: {}",
            generation + 1,
            best_rating,
            threshold,
            survivors
        );
    }

    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize) {
        if evaluated % 50 == 0 || evaluated == total {
            log::debug!("  Evaluated {}/{} individuals", evaluated, total);
        }
    }
}
