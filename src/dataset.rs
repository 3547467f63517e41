//! In-memory dataset representation.
//!
//! A [`Dataset`] owns its rows outright rather than aliasing them.
//! Partitioning (`partition`, `stratify`, `slice`) produces new `Dataset`
//! values rather than views. A shared immutable row store would be a valid
//! optimization but is not implemented here.

use crate::attribute::Attribute;
use crate::error::RipperError;

/// One weighted row over a fixed schema. Missing values are `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<f64>,
    pub weight: f64,
}

impl Row {
    pub fn new(values: Vec<f64>) -> Self {
        Row { values, weight: 1.0 }
    }

    pub fn with_weight(values: Vec<f64>, weight: f64) -> Self {
        Row { values, weight }
    }
}

/// An ordered, schema-typed collection of weighted rows.
///
/// Invariant: `row.values.len() == schema.len()` for every row, and the class
/// attribute (schema index 0) is always discrete.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Vec<Attribute>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from a schema and rows. Panics in debug builds if any
    /// row's width disagrees with the schema or attribute 0 is not discrete;
    /// callers constructing from external input should validate with
    /// [`Dataset::validate`] instead.
    pub fn new(schema: Vec<Attribute>, rows: Vec<Row>) -> Self {
        debug_assert!(schema.first().is_some_and(Attribute::is_discrete), "class attribute must be discrete");
        debug_assert!(rows.iter().all(|r| r.values.len() == schema.len()), "row width must match schema");
        Dataset { schema, rows }
    }

    pub fn create_empty(schema: Vec<Attribute>) -> Self {
        Dataset { schema, rows: Vec::new() }
    }

    /// Validate the external-interface contract: class attribute present,
    /// discrete, non-empty domain, and no row carries a missing class value.
    pub fn validate(&self) -> Result<(), RipperError> {
        match self.schema.first() {
            None => Err(RipperError::WrongClassPosition),
            Some(Attribute::Continuous { .. }) => Err(RipperError::ContinuousClass),
            Some(Attribute::Discrete { domain, .. }) if domain.is_empty() => Err(RipperError::EmptyDomain),
            Some(Attribute::Discrete { .. }) => Ok(()),
        }
    }

    pub fn schema(&self) -> &[Attribute] {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_instances(&self) -> usize {
        self.rows.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.schema.len()
    }

    pub fn num_classes(&self) -> usize {
        self.schema[0].num_values().unwrap_or(0)
    }

    pub fn sum_of_weights(&self) -> f64 {
        self.rows.iter().map(|r| r.weight).sum()
    }

    pub fn class_value(&self, i: usize) -> f64 {
        self.rows[i].values[0]
    }

    pub fn value_of_attr(&self, i: usize, a: usize) -> f64 {
        self.rows[i].values[a]
    }

    pub fn is_missing(&self, i: usize, a: usize) -> bool {
        self.rows[i].values[a].is_nan()
    }

    pub fn weight(&self, i: usize) -> f64 {
        self.rows[i].weight
    }

    pub fn push_instance(&mut self, row: Row) {
        debug_assert_eq!(row.values.len(), self.schema.len());
        self.rows.push(row);
    }

    /// A contiguous sub-dataset `[from, from+len)`.
    pub fn slice(&self, from: usize, len: usize) -> Dataset {
        Dataset { schema: self.schema.clone(), rows: self.rows[from..from + len].to_vec() }
    }

    /// Stable sort by attribute `a`'s value; rows with a missing value at `a`
    /// sort last, in their original relative order.
    pub fn sort_by_attr(&mut self, a: usize) {
        self.rows.sort_by(|x, y| {
            let xv = x.values[a];
            let yv = y.values[a];
            match (xv.is_nan(), yv.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => xv.partial_cmp(&yv).unwrap(),
            }
        });
    }

    /// Renumber the class attribute's domain indices in ascending order of
    /// total weighted count (ties broken by original index), rewriting every
    /// row's class value to match. Returns the per-new-index weighted count.
    pub fn resort_classes_by_count(&mut self) -> Vec<f64> {
        let old_domain = match &self.schema[0] {
            Attribute::Discrete { domain, .. } => domain.clone(),
            Attribute::Continuous { .. } => return Vec::new(),
        };

        let mut counts = vec![0.0_f64; old_domain.len()];
        for row in &self.rows {
            let v = row.values[0];
            if !v.is_nan() {
                counts[v.round() as usize] += row.weight;
            }
        }

        // Stable sort of old indices by (count asc, original index asc).
        let mut order: Vec<usize> = (0..old_domain.len()).collect();
        order.sort_by(|&a, &b| counts[a].partial_cmp(&counts[b]).unwrap().then(a.cmp(&b)));

        // old_to_new[old_index] = new_index
        let mut old_to_new = vec![0usize; old_domain.len()];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx;
        }

        let new_domain: Vec<String> = order.iter().map(|&old_idx| old_domain[old_idx].clone()).collect();
        let new_counts: Vec<f64> = order.iter().map(|&old_idx| counts[old_idx]).collect();

        self.schema[0] = Attribute::Discrete { name: self.schema[0].name().to_string(), domain: new_domain };

        for row in &mut self.rows {
            let v = row.values[0];
            if !v.is_nan() {
                row.values[0] = old_to_new[v.round() as usize] as f64;
            }
        }

        new_counts
    }

    /// Drop rows whose class value is missing.
    pub fn remove_useless_insts(&mut self) {
        self.rows.retain(|r| !r.values[0].is_nan());
    }

    /// Split into `(grow, prune)` folds at position `ceil(n*(k-1)/k)`. The
    /// caller is expected to have already applied [`Dataset::stratify`].
    pub fn partition(&self, k: usize) -> (Dataset, Dataset) {
        assert!(k >= 1, "partition requires at least one fold");
        let n = self.rows.len();
        let pos = (n * (k - 1)).div_ceil(k);
        (self.slice(0, pos), self.slice(pos, n - pos))
    }

    /// Reorder rows so classes are evenly distributed across folds: group
    /// rows by class (stable, preserving within-class order), then build the
    /// output by repeated passes that emit one row from each non-exhausted
    /// class bucket, in ascending class-index order, per pass.
    ///
    /// `k` (the eventual fold count used by [`Dataset::partition`]) does not
    /// otherwise parameterize the interleaving itself; any `k`-way prefix
    /// split of the resulting order inherits roughly proportional class
    /// representation.
    pub fn stratify(&mut self, _k: usize) {
        let num_classes = self.num_classes().max(1);
        let mut buckets: Vec<Vec<Row>> = vec![Vec::new(); num_classes];
        for row in self.rows.drain(..) {
            let c = row.values[0];
            if c.is_nan() {
                buckets[0].push(row); // unreachable post `remove_useless_insts`, kept defensive
            } else {
                buckets[c.round() as usize].push(row);
            }
        }

        let total: usize = buckets.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        let mut cursors = vec![0usize; num_classes];
        loop {
            let mut produced_any = false;
            for (c, bucket) in buckets.iter().enumerate() {
                if cursors[c] < bucket.len() {
                    out.push(bucket[cursors[c]].clone());
                    cursors[c] += 1;
                    produced_any = true;
                }
            }
            if !produced_any {
                break;
            }
        }
        self.rows = out;
    }

    /// Permute this dataset's columns to match `reference`'s attribute
    /// order, matched by name. Errors if the two schemas don't share the
    /// same set of attribute names.
    pub fn sort_attrs_as(&mut self, reference: &[Attribute]) -> Result<(), RipperError> {
        let mut perm = Vec::with_capacity(reference.len());
        let mut missing = Vec::new();
        for attr in reference {
            match self.schema.iter().position(|a| a.name() == attr.name()) {
                Some(idx) => perm.push(idx),
                None => missing.push(attr.name().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(RipperError::SchemaMismatch { missing });
        }

        self.schema = perm.iter().map(|&i| self.schema[i].clone()).collect();
        for row in &mut self.rows {
            row.values = perm.iter().map(|&i| row.values[i]).collect();
        }
        Ok(())
    }

    /// Split into `(matching, non_matching)` by a row-index predicate.
    /// Used by [`crate::rule::Rule::covers`] consumers to materialize the
    /// covered/uncovered residual datasets.
    pub fn split_by<F: Fn(&Dataset, usize) -> bool>(&self, pred: F) -> (Dataset, Dataset) {
        let mut matching = Vec::new();
        let mut non_matching = Vec::new();
        for i in 0..self.rows.len() {
            if pred(self, i) {
                matching.push(self.rows[i].clone());
            } else {
                non_matching.push(self.rows[i].clone());
            }
        }
        (Dataset { schema: self.schema.clone(), rows: matching }, Dataset { schema: self.schema.clone(), rows: non_matching })
    }

    /// Weighted count of rows whose class value equals `class`.
    pub fn weighted_class_count(&self, class: usize) -> f64 {
        self.rows.iter().filter(|r| r.values[0].round() as usize == class).map(|r| r.weight).sum()
    }

    /// Randomly permute row order in place, ahead of [`Dataset::stratify`].
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.rows.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::NumericKind;

    fn weather_schema() -> Vec<Attribute> {
        vec![
            Attribute::discrete("play", vec!["no".into(), "yes".into()]),
            Attribute::continuous("temperature", NumericKind::Float),
        ]
    }

    #[test]
    fn sort_by_attr_puts_missing_last_and_is_stable() {
        let schema = weather_schema();
        let rows = vec![
            Row::new(vec![0.0, 3.0]),
            Row::new(vec![0.0, f64::NAN]),
            Row::new(vec![0.0, 1.0]),
            Row::new(vec![0.0, f64::NAN]),
        ];
        let mut ds = Dataset::new(schema, rows);
        ds.sort_by_attr(1);
        let vals: Vec<f64> = ds.rows().iter().map(|r| r.values[1]).collect();
        assert_eq!(&vals[0..2], &[1.0, 3.0]);
        assert!(vals[2].is_nan() && vals[3].is_nan());
    }

    #[test]
    fn resort_classes_by_count_renumbers_ascending() {
        let schema = weather_schema();
        // 3 rows class=1 ("yes"), 1 row class=0 ("no") -> "no" should become
        // index 0 still (already smaller count), "yes" stays index 1.
        let rows = vec![Row::new(vec![1.0, 1.0]), Row::new(vec![1.0, 2.0]), Row::new(vec![0.0, 3.0]), Row::new(vec![1.0, 4.0])];
        let mut ds = Dataset::new(schema, rows);
        let counts = ds.resort_classes_by_count();
        assert_eq!(counts, vec![1.0, 3.0]);
        assert_eq!(ds.schema()[0].domain().unwrap(), &["no".to_string(), "yes".to_string()]);
    }

    #[test]
    fn resort_classes_by_count_flips_when_majority_is_listed_first() {
        let schema = vec![
            Attribute::discrete("play", vec!["yes".into(), "no".into()]),
            Attribute::continuous("temperature", NumericKind::Float),
        ];
        // "yes"=0 has 3 rows (majority), "no"=1 has 1 row (minority) -> after
        // resort "no" must become new index 0 and "yes" new index 1.
        let rows = vec![Row::new(vec![0.0, 1.0]), Row::new(vec![0.0, 2.0]), Row::new(vec![0.0, 3.0]), Row::new(vec![1.0, 4.0])];
        let mut ds = Dataset::new(schema, rows);
        let counts = ds.resort_classes_by_count();
        assert_eq!(counts, vec![1.0, 3.0]);
        assert_eq!(ds.schema()[0].domain().unwrap(), &["no".to_string(), "yes".to_string()]);
        // The original "no" row (old idx 1) must now carry new idx 0.
        assert_eq!(ds.rows()[3].values[0], 0.0);
        // The three original "yes" rows (old idx 0) must now carry new idx 1.
        assert!(ds.rows()[0..3].iter().all(|r| r.values[0] == 1.0));
    }

    #[test]
    fn partition_splits_at_ceil_boundary() {
        let schema = weather_schema();
        let rows: Vec<Row> = (0..10).map(|i| Row::new(vec![0.0, i as f64])).collect();
        let ds = Dataset::new(schema, rows);
        let (grow, prune) = ds.partition(3); // ceil(10*2/3) = 7
        assert_eq!(grow.num_instances(), 7);
        assert_eq!(prune.num_instances(), 3);
    }

    #[test]
    fn stratify_is_deterministic_and_preserves_within_class_order() {
        let schema = weather_schema();
        let rows = vec![
            Row::new(vec![0.0, 1.0]),
            Row::new(vec![1.0, 2.0]),
            Row::new(vec![0.0, 3.0]),
            Row::new(vec![1.0, 4.0]),
            Row::new(vec![1.0, 5.0]),
        ];
        let mut a = Dataset::new(schema.clone(), rows.clone());
        let mut b = Dataset::new(schema, rows);
        a.stratify(2);
        b.stratify(2);
        assert_eq!(a, b);
        // class 0 rows (temps 1,3) must remain in that relative order
        let class0_temps: Vec<f64> = a.rows().iter().filter(|r| r.values[0] == 0.0).map(|r| r.values[1]).collect();
        assert_eq!(class0_temps, vec![1.0, 3.0]);
    }

    #[test]
    fn sort_attrs_as_errors_on_missing_attribute() {
        let schema = weather_schema();
        let mut ds = Dataset::new(schema, vec![Row::new(vec![0.0, 1.0])]);
        let other = vec![Attribute::discrete("humidity", vec!["low".into(), "high".into()])];
        let err = ds.sort_attrs_as(&other).unwrap_err();
        assert!(matches!(err, RipperError::SchemaMismatch { .. }));
    }

    #[test]
    fn remove_useless_insts_drops_missing_class_rows() {
        let schema = weather_schema();
        let rows = vec![Row::new(vec![0.0, 1.0]), Row::new(vec![f64::NAN, 2.0])];
        let mut ds = Dataset::new(schema, rows);
        ds.remove_useless_insts();
        assert_eq!(ds.num_instances(), 1);
    }
}
