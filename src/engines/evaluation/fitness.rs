use crate::engines::evaluation::individual::Individual;
use crate::types::{Evaluation, Value};

/// Rating of a program whose outputs match exactly.
pub const PERFECT_RATING: f64 = 100.0;

/// Rate `individual` against `expected`, running it first if needed.
pub fn evaluate(individual: &mut Individual, expected: &[Value], threshold: f64) -> Evaluation {
    if !individual.is_executed() {
        individual.execute();
    }

    let rating = rate(individual.outputs(), expected);
    individual.set_rating(rating);

    Evaluation {
        passed: rating >= threshold,
        rating,
    }
}

/// Multiplicative closeness of `observed` to `expected`, scaled to `0..=100`.
///
/// The shorter list is padded with zeros, so missing or extra outputs cost
/// score rather than failing. One bad position drags the whole product down.
pub fn rate(observed: &[Value], expected: &[Value]) -> f64 {
    let len = observed.len().max(expected.len());
    let mut observed = observed.to_vec();
    let mut expected = expected.to_vec();
    pad(&mut observed, len);
    pad(&mut expected, len);

    let score = observed
        .iter()
        .zip(&expected)
        .fold(1.0, |score, (o, e)| score * component(*o, *e));

    (score * PERFECT_RATING).clamp(0.0, PERFECT_RATING)
}

/// Append zeros until `values` holds `len` entries. Returns how many were added.
pub fn pad(values: &mut Vec<Value>, len: usize) -> usize {
    let added = len.saturating_sub(values.len());
    values.resize(values.len() + added, 0);
    added
}

fn component(observed: Value, expected: Value) -> f64 {
    let observed = observed as f64;
    let expected = expected as f64;
    let denominator = expected.abs().max(observed.abs());

    if denominator == 0.0 {
        return 1.0;
    }

    let mut ratio = (observed - expected).abs() / denominator;
    if ratio > 1.0 {
        ratio = 1.0 / ratio;
    }

    1.0 - ratio
}
