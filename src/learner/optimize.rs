//! Post-hoc ruleset optimization: revise or replace each non-default rule
//! in turn, keeping whichever variant has the lowest relative description
//! length.

use crate::dataset::Dataset;
use crate::error::RipperError;
use crate::learner::RipperConfig;
use crate::log::TrainLog;
use crate::rule::Rule;
use crate::rule_stats::RuleStats;

pub fn optimize_ruleset(
    mut rules: Vec<Rule>,
    data: &Dataset,
    config: &RipperConfig,
    class_counts: &[f64],
    log: &dyn TrainLog,
) -> Result<Vec<Rule>, RipperError> {
    let num_all_conditions = RuleStats::new(data.clone()).num_all_conditions();

    for pass in 0..config.optimization_runs {
        for i in 0..rules.len() {
            if rules[i].is_default() {
                continue;
            }
            optimize_one(&mut rules, i, data, config, num_all_conditions, class_counts)?;
        }
        log.optimization_pass(pass, rules.len());
    }

    Ok(rules)
}

fn optimize_one(
    rules: &mut [Rule],
    i: usize,
    data: &Dataset,
    config: &RipperConfig,
    num_all_conditions: f64,
    class_counts: &[f64],
) -> Result<(), RipperError> {
    let class = rules[i].consequent;
    let exp_fp_rate = RuleStats::exp_fp_rate(class_counts, class);

    // Data available to this rule: not covered by any earlier rule, and not
    // covered by any later rule (those already claim it).
    let mut available = data.clone();
    for r in &rules[0..i] {
        available = available.split_by(|d, k| r.covers(d, k)).1;
    }
    available = RuleStats::rm_covered_by_successives(&available, rules, i + 1);

    let mut folds = available.clone();
    folds.stratify(config.folds);
    let (grow_fold, prune_fold) = folds.partition(config.folds);

    // Revise: keep growing the existing rule from the subset of the grow
    // fold it still covers.
    let mut revised = rules[i].clone();
    let covered_grow = grow_fold.split_by(|d, k| revised.covers(d, k)).0;
    revised.grow(covered_grow, config.min_no);
    revised.prune(&prune_fold, true);

    // Replace: grow a fresh rule from scratch on the same folds.
    let mut replaced = Rule::new(class);
    replaced.grow(grow_fold, config.min_no);
    replaced.prune(&prune_fold, true);

    let score = |rule: &Rule| -> Result<f64, RipperError> {
        let mut stats = RuleStats::new(available.clone());
        let metrics = stats.push_rule(rule);
        RuleStats::checked_dl(i, RuleStats::relative_dl(rule, metrics, num_all_conditions, exp_fp_rate))
    };

    let mut best = rules[i].clone();
    let mut best_score = score(&best)?;
    let revised_score = score(&revised)?;
    if revised_score < best_score {
        best = revised;
        best_score = revised_score;
    }
    let replaced_score = score(&replaced)?;
    if replaced_score < best_score {
        best = replaced;
    }

    rules[i] = best;
    Ok(())
}
