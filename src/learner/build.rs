//! Per-class rule growing (the inner IREP* loop).

use crate::dataset::Dataset;
use crate::error::RipperError;
use crate::learner::RipperConfig;
use crate::log::TrainLog;
use crate::rule::Rule;
use crate::rule_stats::{RuleMetrics, RuleStats, MDL_SLACK_BITS};

/// Grow rules for `class` against `data` until no positive instances of
/// `class` remain uncovered, a grown rule can't beat even chance, its error
/// rate on what it covers exceeds 50% (the classic IREP* stopping rule), or
/// accepting it would push the ruleset's running description length more
/// than [`MDL_SLACK_BITS`] above the best length seen so far. Returns the
/// rules built and the residual data (with every row covered by a kept rule
/// removed) for the next class to work with.
pub fn grow_ruleset_for_class(
    mut data: Dataset,
    class: usize,
    exp_fp_rate: f64,
    config: &RipperConfig,
    log: &dyn TrainLog,
) -> Result<(Vec<Rule>, Dataset), RipperError> {
    let mut rules = Vec::new();

    let class_w = data.weighted_class_count(class);
    if class_w == 0.0 {
        return Ok((rules, data));
    }

    let num_all_conditions = RuleStats::new(data.clone()).num_all_conditions();
    let total_w = data.sum_of_weights();
    let def_dl = RuleStats::data_dl(exp_fp_rate, RuleMetrics { tp: 0.0, fp: 0.0, total_pos: class_w, total_neg: total_w - class_w });
    let mut dl_accum = 0.0_f64;
    let mut min_dl = def_dl;

    loop {
        if data.weighted_class_count(class) == 0.0 {
            break;
        }

        let mut folds = data.clone();
        folds.stratify(config.folds);
        let (grow_fold, prune_fold) = folds.partition(config.folds);

        let mut rule = Rule::new(class);
        rule.grow(grow_fold, config.min_no);
        if rule.antecedents.is_empty() {
            break;
        }

        let before = rule.antecedents.len();
        if config.use_pruning {
            rule.prune(&prune_fold, false);
        }
        log.rule_pruned(class, &rule, before, rule.antecedents.len());
        if rule.antecedents.is_empty() {
            break;
        }

        let mut stats = RuleStats::new(data.clone());
        let metrics = stats.push_rule(&rule);
        if metrics.tp <= 0.0 {
            break;
        }
        if config.check_error_rate && metrics.cover() > 0.0 && metrics.fp / metrics.cover() >= 0.5 {
            break;
        }

        let (_, uncovered) = data.split_by(|d, i| rule.covers(d, i));
        let remaining_class_w = uncovered.weighted_class_count(class);
        let remaining_total_w = uncovered.sum_of_weights();
        let remaining_metrics =
            RuleMetrics { tp: 0.0, fp: 0.0, total_pos: remaining_class_w, total_neg: remaining_total_w - remaining_class_w };

        let rule_dl = RuleStats::theory_dl(&rule, num_all_conditions) + RuleStats::data_dl(exp_fp_rate, metrics);
        let candidate_dl = RuleStats::checked_dl(
            rules.len(),
            dl_accum + rule_dl + RuleStats::data_dl(exp_fp_rate, remaining_metrics),
        )?;

        if candidate_dl < min_dl {
            min_dl = candidate_dl;
        }
        if candidate_dl > min_dl + MDL_SLACK_BITS {
            break;
        }

        log.rule_grown(class, &rule, rule.antecedents.len());
        dl_accum += rule_dl;
        data = uncovered;
        rules.push(rule);
    }

    Ok((rules, data))
}
