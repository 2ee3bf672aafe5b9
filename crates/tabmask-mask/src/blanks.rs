use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How blank decisions are drawn for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlankSampling {
    /// Randomized systematic sampling over a shuffled order.
    ///
    /// Each unit is blank with probability exactly `rate`, and the number of
    /// blanks over `n` units is `floor(n * rate)` or `ceil(n * rate)`.
    #[default]
    Stratified,
    /// One independent draw per unit.
    Bernoulli,
}

impl BlankSampling {
    pub fn as_str(self) -> &'static str {
        match self {
            BlankSampling::Stratified => "stratified",
            BlankSampling::Bernoulli => "bernoulli",
        }
    }
}

/// Decide which of `units` substitution units become blank.
///
/// `rate` must already be validated to lie in `[0, 1]`.
pub fn blank_plan(
    units: usize,
    rate: f64,
    sampling: BlankSampling,
    rng: &mut dyn RngCore,
) -> Vec<bool> {
    if units == 0 || rate <= 0.0 {
        return vec![false; units];
    }
    if rate >= 1.0 {
        return vec![true; units];
    }

    match sampling {
        BlankSampling::Bernoulli => (0..units).map(|_| rng.random::<f64>() < rate).collect(),
        BlankSampling::Stratified => stratified(units, rate, rng),
    }
}

fn stratified(units: usize, rate: f64, rng: &mut dyn RngCore) -> Vec<bool> {
    let mut order: Vec<usize> = (0..units).collect();
    order.shuffle(rng);
    let offset: f64 = rng.random();

    let mut plan = vec![false; units];
    for (step, unit) in order.into_iter().enumerate() {
        let before = (offset + step as f64 * rate).floor();
        let after = (offset + (step + 1) as f64 * rate).floor();
        plan[unit] = after > before;
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_and_full_rates_are_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(
            blank_plan(10, 0.0, BlankSampling::Stratified, &mut rng)
                .iter()
                .all(|blank| !blank)
        );
        assert!(
            blank_plan(10, 1.0, BlankSampling::Bernoulli, &mut rng)
                .iter()
                .all(|blank| *blank)
        );
        assert!(blank_plan(0, 0.5, BlankSampling::Stratified, &mut rng).is_empty());
    }

    #[test]
    fn stratified_count_stays_within_one_of_expectation() {
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for (units, rate) in [(4_usize, 0.5), (7, 0.3), (10, 0.25), (3, 0.9)] {
                let blanks = blank_plan(units, rate, BlankSampling::Stratified, &mut rng)
                    .into_iter()
                    .filter(|blank| *blank)
                    .count();
                let expected = units as f64 * rate;
                assert!(
                    blanks == expected.floor() as usize || blanks == expected.ceil() as usize,
                    "seed {seed}: {blanks} blanks for {units} units at {rate}"
                );
            }
        }
    }

    #[test]
    fn stratified_spreads_blanks_across_units() {
        let mut hits = [0_u32; 4];
        for seed in 0..400 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for (unit, blank) in blank_plan(4, 0.5, BlankSampling::Stratified, &mut rng)
                .into_iter()
                .enumerate()
            {
                if blank {
                    hits[unit] += 1;
                }
            }
        }
        for count in hits {
            assert!((150..=250).contains(&count), "unit blanked {count} times");
        }
    }
}
