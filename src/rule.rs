//! Conjunctions of antecedents predicting a class index.
//!
//! Growing and pruning take ownership of the data they consume rather than
//! aliasing it: `grow` consumes `grow_data` and the final residual subset is
//! threaded through the loop as an owned value, favoring explicit ownership
//! over shared mutable state.

use crate::antecedent::{Antecedent, Direction};
use crate::dataset::Dataset;
use std::collections::HashMap;

/// A conjunction of antecedents plus the class index it predicts. An empty
/// antecedent list covers every row (the "default rule").
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub consequent: usize,
    pub antecedents: Vec<Antecedent>,
}

impl Rule {
    pub fn new(consequent: usize) -> Self {
        Rule { consequent, antecedents: Vec::new() }
    }

    pub fn default_rule(consequent: usize) -> Self {
        Rule::new(consequent)
    }

    pub fn is_default(&self) -> bool {
        self.antecedents.is_empty()
    }

    /// AND of every antecedent's `covers`; vacuously true for the default
    /// rule.
    pub fn covers(&self, data: &Dataset, i: usize) -> bool {
        self.antecedents.iter().all(|a| a.covers(data, i))
    }

    /// Greedy hill-climbing growth, consuming `grow_data`.
    pub fn grow(&mut self, mut grow_data: Dataset, min_no: f64) {
        let num_attrs = grow_data.num_attributes();
        if num_attrs == 0 {
            return;
        }

        let mut used = vec![false; num_attrs];
        used[0] = true; // the class attribute is never itself tested
        for a in &self.antecedents {
            if a.is_discrete() {
                used[a.att_idx()] = true;
            }
        }

        let mut def_accu_rate = 0.0_f64;
        loop {
            if grow_data.num_instances() == 0 {
                break;
            }
            let any_unused_discrete =
                (1..num_attrs).any(|a| !used[a] && grow_data.schema()[a].is_discrete());
            let any_continuous = (1..num_attrs).any(|a| !grow_data.schema()[a].is_discrete());
            if !any_unused_discrete && !any_continuous {
                break;
            }
            if def_accu_rate >= 1.0 {
                break;
            }

            let def_accu: f64 = (0..grow_data.num_instances())
                .filter(|&i| grow_data.class_value(i).round() as usize == self.consequent)
                .map(|i| grow_data.weight(i))
                .sum();
            def_accu_rate = (def_accu + 1.0) / (grow_data.sum_of_weights() + 1.0);

            let mut best: Option<(Antecedent, Dataset, f64)> = None;
            for a in 1..num_attrs {
                let is_discrete = grow_data.schema()[a].is_discrete();
                if is_discrete && used[a] {
                    continue;
                }
                let mut candidate =
                    if is_discrete { Antecedent::new_discrete(a) } else { Antecedent::new_continuous(a) };
                let Some(parts) = candidate.split_data(&grow_data, def_accu_rate, self.consequent) else {
                    continue;
                };
                let gain = candidate.stats().max_info_gain;
                let covered = covered_partition(&candidate, parts);
                let improves = match &best {
                    None => true,
                    Some((_, _, best_gain)) => gain > *best_gain,
                };
                if improves {
                    best = Some((candidate, covered, gain));
                }
            }

            let Some((antecedent, covered, _gain)) = best else { break };
            if antecedent.stats().accu < min_no {
                break;
            }

            let accu_rate = antecedent.stats().accu_rate;
            if antecedent.is_discrete() {
                used[antecedent.att_idx()] = true;
            }
            self.antecedents.push(antecedent);
            grow_data = covered;
            def_accu_rate = accu_rate;
        }
    }

    /// Reduced-error pruning: truncate the antecedent list to the length
    /// that maximizes worth on `prune_data`. If no prefix beats the default
    /// (always-true) rule's worth, the rule is left unpruned.
    pub fn prune(&mut self, prune_data: &Dataset, use_whole: bool) {
        let size = self.antecedents.len();
        if size == 0 {
            return;
        }
        let total_w = prune_data.sum_of_weights();
        if total_w == 0.0 {
            return;
        }

        let def_accu: f64 = (0..prune_data.num_instances())
            .filter(|&i| prune_data.class_value(i).round() as usize == self.consequent)
            .map(|i| prune_data.weight(i))
            .sum();
        let max_value = (def_accu + 1.0) / (total_w + 2.0);

        let mut worth_rate = vec![0.0_f64; size];
        for x in 0..size {
            let prefix = &self.antecedents[0..=x];
            let mut cov_w = 0.0_f64;
            let mut match_w = 0.0_f64;
            let mut tn = 0.0_f64;
            for i in 0..prune_data.num_instances() {
                let w = prune_data.weight(i);
                let is_target = prune_data.class_value(i).round() as usize == self.consequent;
                if prefix.iter().all(|a| a.covers(prune_data, i)) {
                    cov_w += w;
                    if is_target {
                        match_w += w;
                    }
                } else if use_whole && !is_target {
                    tn += w;
                }
            }
            worth_rate[x] =
                if use_whole { (match_w + tn) / total_w } else { (match_w + 1.0) / (cov_w + 2.0) };
        }

        let mut best_idx = None;
        let mut best_rate = f64::NEG_INFINITY;
        for (x, &rate) in worth_rate.iter().enumerate() {
            if rate > max_value && rate > best_rate {
                best_rate = rate;
                best_idx = Some(x);
            }
        }

        if let Some(idx) = best_idx {
            self.antecedents.truncate(idx + 1);
        }
    }

    /// Remove numeric antecedents dominated by a tighter bound on the same
    /// attribute and direction, keeping at most one `≤` and one `≥` test per
    /// continuous attribute.
    pub fn clean_up(&mut self, _data: &Dataset) {
        let mut min_kept: HashMap<usize, (f64, usize)> = HashMap::new();
        let mut max_kept: HashMap<usize, (f64, usize)> = HashMap::new();
        let mut keep = vec![true; self.antecedents.len()];

        for idx in (0..self.antecedents.len()).rev() {
            let Antecedent::Continuous { att_idx, split_point, direction, .. } = &self.antecedents[idx] else {
                continue;
            };
            match direction {
                Direction::Le => {
                    let tighter = match min_kept.get(att_idx) {
                        Some(&(cur, _)) => *split_point < cur,
                        None => true,
                    };
                    if tighter {
                        if let Some(&(_, prev_idx)) = min_kept.get(att_idx) {
                            keep[prev_idx] = false;
                        }
                        min_kept.insert(*att_idx, (*split_point, idx));
                    } else {
                        keep[idx] = false;
                    }
                }
                Direction::Ge => {
                    let tighter = match max_kept.get(att_idx) {
                        Some(&(cur, _)) => *split_point > cur,
                        None => true,
                    };
                    if tighter {
                        if let Some(&(_, prev_idx)) = max_kept.get(att_idx) {
                            keep[prev_idx] = false;
                        }
                        max_kept.insert(*att_idx, (*split_point, idx));
                    } else {
                        keep[idx] = false;
                    }
                }
            }
        }

        let mut it = keep.into_iter();
        self.antecedents.retain(|_| it.next().unwrap());
    }
}

fn covered_partition(antecedent: &Antecedent, parts: Vec<Dataset>) -> Dataset {
    match antecedent {
        Antecedent::Discrete { target, .. } => parts.into_iter().nth(*target).expect("bag index in range"),
        Antecedent::Continuous { direction, .. } => {
            let idx = match direction {
                Direction::Le => 0,
                Direction::Ge => 1,
            };
            parts.into_iter().nth(idx).expect("partition index in range")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antecedent::AntecedentStats;
    use crate::attribute::{Attribute, NumericKind};
    use crate::dataset::Row;

    fn weather_schema() -> Vec<Attribute> {
        vec![
            Attribute::discrete("play", vec!["no".into(), "yes".into()]),
            Attribute::discrete("outlook", vec!["sunny".into(), "overcast".into(), "rain".into()]),
            Attribute::continuous("humidity", NumericKind::Float),
        ]
    }

    #[test]
    fn grow_never_reuses_discrete_attribute() {
        let schema = weather_schema();
        let rows: Vec<Row> = vec![
            Row::new(vec![0.0, 0.0, 90.0]),
            Row::new(vec![0.0, 0.0, 95.0]),
            Row::new(vec![1.0, 1.0, 70.0]),
            Row::new(vec![1.0, 2.0, 65.0]),
        ];
        let data = Dataset::new(schema, rows);
        let mut rule = Rule::new(0);
        rule.grow(data, 1.0);

        let mut seen_discrete = std::collections::HashSet::new();
        for a in &rule.antecedents {
            if a.is_discrete() {
                assert!(seen_discrete.insert(a.att_idx()), "discrete attribute reused");
            }
        }
    }

    #[test]
    fn prune_truncates_to_best_worth() {
        let schema = weather_schema();
        // Rule: outlook==sunny AND humidity<=80 => no
        // Prune data where the second antecedent hurts the rule's worth.
        let rows = vec![
            Row::new(vec![0.0, 0.0, 70.0]), // sunny, humidity 70 -> matches both
            Row::new(vec![1.0, 0.0, 90.0]), // sunny, humidity 90 -> matches only first antecedent
            Row::new(vec![1.0, 1.0, 60.0]), // overcast -> matches neither
        ];
        let prune_data = Dataset::new(schema, rows);
        let mut rule = Rule::new(0);
        rule.antecedents.push(Antecedent::Discrete {
            att_idx: 1,
            target: 0,
            stats: AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 },
        });
        rule.antecedents.push(Antecedent::Continuous {
            att_idx: 2,
            split_point: 80.0,
            direction: crate::antecedent::Direction::Le,
            stats: AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 },
        });
        rule.prune(&prune_data, false);
        assert_eq!(rule.antecedents.len(), 1);
    }

    #[test]
    fn prune_leaves_rule_unpruned_when_no_prefix_beats_the_default() {
        let schema = vec![Attribute::discrete("play", vec!["no".into(), "yes".into()]), weather_schema()[1].clone()];
        // Every row is class "no"; the antecedent only covers half of them,
        // so its worth is lower than just predicting the default everywhere.
        let rows = vec![
            Row::new(vec![0.0, 0.0]),
            Row::new(vec![0.0, 0.0]),
            Row::new(vec![0.0, 1.0]),
            Row::new(vec![0.0, 1.0]),
        ];
        let prune_data = Dataset::new(schema, rows);
        let mut rule = Rule::new(0);
        rule.antecedents.push(Antecedent::Discrete {
            att_idx: 1,
            target: 0,
            stats: AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 },
        });
        rule.prune(&prune_data, false);
        assert_eq!(rule.antecedents.len(), 1, "rule should stay unpruned, not cleared");
    }

    #[test]
    fn clean_up_keeps_only_tightest_le_bound() {
        let schema = vec![
            Attribute::discrete("class", vec!["a".into(), "b".into()]),
            Attribute::continuous("x", NumericKind::Float),
        ];
        let data = Dataset::create_empty(schema);
        let mut rule = Rule::new(0);
        let stats = AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 };
        rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 10.0, direction: Direction::Le, stats });
        rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 20.0, direction: Direction::Le, stats });
        rule.clean_up(&data);
        assert_eq!(rule.antecedents.len(), 1);
        match &rule.antecedents[0] {
            Antecedent::Continuous { split_point, .. } => assert_eq!(*split_point, 10.0),
            _ => panic!("expected continuous"),
        }
    }

    #[test]
    fn clean_up_keeps_one_le_and_one_ge() {
        let schema = vec![
            Attribute::discrete("class", vec!["a".into(), "b".into()]),
            Attribute::continuous("x", NumericKind::Float),
        ];
        let data = Dataset::create_empty(schema);
        let mut rule = Rule::new(0);
        let stats = AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 };
        rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 10.0, direction: Direction::Le, stats });
        rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 5.0, direction: Direction::Ge, stats });
        rule.clean_up(&data);
        assert_eq!(rule.antecedents.len(), 2);
    }
}
