//! Training progress callbacks.
//!
//! An injectable sink trait keeps `ripper_core` usable as a library (no
//! global logger forced on callers) while still going through `log` macros
//! for anyone who does install one.

use crate::rule::Rule;

/// Callback invoked as the learner makes progress, so a caller (CLI, test
/// harness, notebook) can report on a long training run without the core
/// crate depending on any particular UI.
pub trait TrainLog {
    fn class_started(&self, _class: usize, _class_name: &str) {}
    fn rule_grown(&self, _class: usize, _rule: &Rule, _antecedents: usize) {}
    fn rule_pruned(&self, _class: usize, _rule: &Rule, _antecedents_before: usize, _antecedents_after: usize) {}
    fn class_finished(&self, _class: usize, _rules_kept: usize) {}
    fn optimization_pass(&self, _pass: usize, _total_rules: usize) {}
}

/// Discards every event; the default when a caller doesn't care.
pub struct NullLog;

impl TrainLog for NullLog {}

/// Routes every event through the `log` crate at an appropriate level.
pub struct TracingLog;

impl TrainLog for TracingLog {
    fn class_started(&self, class: usize, class_name: &str) {
        log::debug!("class {class} ({class_name}): growing rules");
    }

    fn rule_grown(&self, class: usize, _rule: &Rule, antecedents: usize) {
        log::trace!("class {class}: grew rule with {antecedents} antecedent(s)");
    }

    fn rule_pruned(&self, class: usize, _rule: &Rule, before: usize, after: usize) {
        log::trace!("class {class}: pruned rule from {before} to {after} antecedent(s)");
    }

    fn class_finished(&self, class: usize, rules_kept: usize) {
        log::debug!("class {class}: finished with {rules_kept} rule(s)");
    }

    fn optimization_pass(&self, pass: usize, total_rules: usize) {
        log::info!("optimization pass {pass}: {total_rules} rule(s) in ruleset");
    }
}
