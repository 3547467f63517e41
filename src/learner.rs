//! Training entry point: grows a ruleset class by class, then optimizes it.
//!
//! Split into focused submodules under `src/learner/` while keeping the
//! public path (`crate::learner::RipperLearner`) stable.
//!
//! - `build.rs`: per-class IREP* rule growing.
//! - `optimize.rs`: revise/replace passes over the whole ruleset.

#[path = "learner/build.rs"]
mod build;
#[path = "learner/optimize.rs"]
mod optimize;

use crate::dataset::Dataset;
use crate::error::RipperError;
use crate::log::{NullLog, TrainLog};
use crate::model::RuleBasedModel;
use crate::rng::{RipperRng, DEFAULT_SEED};
use crate::rule::Rule;
use crate::rule_stats::RuleStats;

/// Tunable knobs for the learning algorithm. Defaults mirror the classic
/// RIPPER/JRip parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RipperConfig {
    /// Number of folds used to split grow/prune data via stratified
    /// partitioning. JRip's default is 3.
    pub folds: usize,
    /// Minimum total weight a grown antecedent must cover to be accepted.
    pub min_no: f64,
    /// Number of revise/replace optimization passes over the whole ruleset.
    pub optimization_runs: usize,
    /// Stop growing rules for a class once a candidate rule's error rate on
    /// what it covers reaches 50% (IREP*'s termination heuristic).
    pub check_error_rate: bool,
    /// Whether to reduced-error-prune each grown rule before accepting it.
    pub use_pruning: bool,
    pub seed: u64,
}

impl Default for RipperConfig {
    fn default() -> Self {
        RipperConfig { folds: 3, min_no: 2.0, optimization_runs: 2, check_error_rate: true, use_pruning: true, seed: DEFAULT_SEED }
    }
}

pub struct RipperLearner {
    config: RipperConfig,
}

impl RipperLearner {
    pub fn new(config: RipperConfig) -> Self {
        RipperLearner { config }
    }

    pub fn train(&self, data: Dataset) -> Result<RuleBasedModel, RipperError> {
        self.train_with_log(data, &NullLog)
    }

    pub fn train_with_log(&self, mut data: Dataset, log: &dyn TrainLog) -> Result<RuleBasedModel, RipperError> {
        data.validate()?;
        data.remove_useless_insts();
        if data.num_instances() == 0 {
            return Err(RipperError::EmptyDataset);
        }

        let class_counts = data.resort_classes_by_count();
        let num_classes = data.num_classes();

        // A seed drives a single pre-shuffle up front, not a reshuffle before
        // every stratify call downstream.
        let mut rng = RipperRng::new(self.config.seed);
        data.shuffle(rng.inner());

        let schema = data.schema().to_vec();
        let full_data = data.clone();

        let mut all_rules = Vec::new();
        let mut working = data;
        for class in 0..num_classes.saturating_sub(1) {
            if working.weighted_class_count(class) == 0.0 {
                continue;
            }
            let class_name = schema[0].domain().expect("class attribute is discrete")[class].clone();
            log.class_started(class, &class_name);
            let exp_fp_rate = RuleStats::exp_fp_rate(&class_counts, class);
            let (class_rules, remaining) = build::grow_ruleset_for_class(working, class, exp_fp_rate, &self.config, log)?;
            log.class_finished(class, class_rules.len());
            all_rules.extend(class_rules);
            working = remaining;
        }

        let majority_class = num_classes.saturating_sub(1);
        all_rules.push(Rule::default_rule(majority_class));

        let mut optimized = optimize::optimize_ruleset(all_rules, &full_data, &self.config, &class_counts, log)?;

        for rule in &mut optimized {
            rule.clean_up(&full_data);
        }

        let num_all_conditions = RuleStats::new(full_data.clone()).num_all_conditions();
        let keep = RuleStats::reduce_dl(full_data.clone(), &optimized, num_all_conditions, &class_counts)?.max(1);
        optimized.truncate(keep);
        if optimized.last().is_none_or(|r| !r.is_default()) {
            optimized.push(Rule::default_rule(majority_class));
        }

        Ok(RuleBasedModel::new(schema, optimized))
    }
}
