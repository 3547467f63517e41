//! Seeded randomness for fold construction.
//!
//! `rand`'s `small_rng` feature gets a fast, seedable, `!Send`-free PRNG
//! rather than hand-rolling an LCG.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Default seed used when a caller doesn't override it. Training must be
/// reproducible: the same seed always produces the same ruleset.
pub const DEFAULT_SEED: u64 = 1;

pub struct RipperRng(SmallRng);

impl RipperRng {
    pub fn new(seed: u64) -> Self {
        RipperRng(SmallRng::seed_from_u64(seed))
    }

    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

impl Default for RipperRng {
    fn default() -> Self {
        RipperRng::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, NumericKind};
    use crate::dataset::{Dataset, Row};

    #[test]
    fn same_seed_produces_same_shuffle() {
        let schema = vec![
            Attribute::discrete("class", vec!["a".into(), "b".into()]),
            Attribute::continuous("x", NumericKind::Float),
        ];
        let rows: Vec<Row> = (0..20).map(|i| Row::new(vec![(i % 2) as f64, i as f64])).collect();

        let mut a = Dataset::new(schema.clone(), rows.clone());
        let mut b = Dataset::new(schema, rows);
        let mut rng_a = RipperRng::new(42);
        let mut rng_b = RipperRng::new(42);
        a.shuffle(rng_a.inner());
        b.shuffle(rng_b.inner());
        assert_eq!(a, b);
    }
}
