//! Single atomic tests on one attribute.
//!
//! As with [`crate::attribute::Attribute`], discrete and continuous tests are
//! a tagged `enum` rather than a class hierarchy, so `split_data`/`covers` can
//! pattern-match exhaustively instead of dispatching through a vtable.

use crate::dataset::Dataset;

/// Direction of a continuous antecedent's threshold test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Le = 0,
    Ge = 1,
}

/// Scoring fields filled in by [`Antecedent::split_data`] and consumed by
/// `Rule::grow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntecedentStats {
    pub max_info_gain: f64,
    pub accu_rate: f64,
    pub cover: f64,
    pub accu: f64,
}

impl AntecedentStats {
    fn unset() -> Self {
        AntecedentStats { max_info_gain: f64::NAN, accu_rate: f64::NAN, cover: 0.0, accu: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Discrete { att_idx: usize, target: usize, stats: AntecedentStats },
    Continuous { att_idx: usize, split_point: f64, direction: Direction, stats: AntecedentStats },
}

impl Antecedent {
    /// A fresh, unscored discrete antecedent candidate for attribute
    /// `att_idx`. The target domain index is filled in by `split_data`.
    pub fn new_discrete(att_idx: usize) -> Self {
        Antecedent::Discrete { att_idx, target: usize::MAX, stats: AntecedentStats::unset() }
    }

    /// A fresh, unscored continuous antecedent candidate for attribute
    /// `att_idx`. Split point and direction are filled in by `split_data`.
    pub fn new_continuous(att_idx: usize) -> Self {
        Antecedent::Continuous { att_idx, split_point: f64::NAN, direction: Direction::Le, stats: AntecedentStats::unset() }
    }

    pub fn att_idx(&self) -> usize {
        match self {
            Antecedent::Discrete { att_idx, .. } => *att_idx,
            Antecedent::Continuous { att_idx, .. } => *att_idx,
        }
    }

    pub fn stats(&self) -> AntecedentStats {
        match self {
            Antecedent::Discrete { stats, .. } => *stats,
            Antecedent::Continuous { stats, .. } => *stats,
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Antecedent::Discrete { .. })
    }

    /// `missing` ⇒ `false` for continuous; discrete also returns `false` on
    /// missing. Otherwise compares the row's value against the threshold.
    pub fn covers(&self, data: &Dataset, i: usize) -> bool {
        if data.is_missing(i, self.att_idx()) {
            return false;
        }
        match self {
            Antecedent::Discrete { target, .. } => data.value_of_attr(i, self.att_idx()).round() as usize == *target,
            Antecedent::Continuous { split_point, direction, .. } => {
                let v = data.value_of_attr(i, self.att_idx());
                match direction {
                    Direction::Le => v <= *split_point,
                    Direction::Ge => v >= *split_point,
                }
            }
        }
    }

    /// Score this antecedent against `data` for `target_class`, given the
    /// rule's running default accuracy rate. Returns the partitions induced
    /// by the best candidate split, or `None` if no split is possible
    /// (continuous: no non-missing rows).
    pub fn split_data(&mut self, data: &Dataset, def_accu_rate: f64, target_class: usize) -> Option<Vec<Dataset>> {
        match self {
            Antecedent::Discrete { att_idx, target, stats } => {
                split_discrete(*att_idx, target, stats, data, def_accu_rate, target_class)
            }
            Antecedent::Continuous { att_idx, split_point, direction, stats } => {
                split_continuous(*att_idx, split_point, direction, stats, data, def_accu_rate, target_class)
            }
        }
    }
}

fn split_discrete(
    att_idx: usize,
    target: &mut usize,
    stats: &mut AntecedentStats,
    data: &Dataset,
    def_accu_rate: f64,
    target_class: usize,
) -> Option<Vec<Dataset>> {
    let num_values = data.schema()[att_idx].num_values().unwrap_or(0);
    let mut bags: Vec<Dataset> = (0..num_values).map(|_| Dataset::create_empty(data.schema().to_vec())).collect();

    for i in 0..data.num_instances() {
        if data.is_missing(i, att_idx) {
            continue;
        }
        let bag = data.value_of_attr(i, att_idx).round() as usize;
        bags[bag].push_instance(data.rows()[i].clone());
    }

    let mut best_gain = f64::NEG_INFINITY;
    let mut best_bag = None;
    for (bag_idx, bag) in bags.iter().enumerate() {
        let bag_w = bag.sum_of_weights();
        let class_matches_w = bag.weighted_class_count(target_class);
        let p = class_matches_w + 1.0;
        let t = bag_w + 1.0;
        let info_gain = class_matches_w * ((p / t).log2() - def_accu_rate.log2());
        if info_gain > best_gain {
            best_gain = info_gain;
            best_bag = Some((bag_idx, bag_w, class_matches_w, p / t));
        }
    }

    let (bag_idx, cover, accu, accu_rate) = best_bag?;
    *target = bag_idx;
    *stats = AntecedentStats { max_info_gain: best_gain, accu_rate, cover, accu };
    Some(bags)
}

#[allow(clippy::too_many_arguments)]
fn split_continuous(
    att_idx: usize,
    split_point: &mut f64,
    direction: &mut Direction,
    stats: &mut AntecedentStats,
    data: &Dataset,
    def_accu_rate: f64,
    target_class: usize,
) -> Option<Vec<Dataset>> {
    let mut sorted = data.clone();
    sorted.sort_by_attr(att_idx);

    let total = (0..sorted.num_instances()).take_while(|&i| !sorted.is_missing(i, att_idx)).count();
    if total == 0 {
        return None;
    }

    // Prefix sums over the non-missing, sorted prefix.
    let mut prefix_w = vec![0.0_f64; total + 1];
    let mut prefix_match = vec![0.0_f64; total + 1];
    for i in 0..total {
        let w = sorted.weight(i);
        let is_match = sorted.class_value(i).round() as usize == target_class;
        prefix_w[i + 1] = prefix_w[i] + w;
        prefix_match[i + 1] = prefix_match[i] + if is_match { w } else { 0.0 };
    }
    let total_w = prefix_w[total];
    let total_match = prefix_match[total];

    let mut best_gain = f64::NEG_INFINITY;
    let mut best: Option<(usize, Direction, f64, f64, f64)> = None; // (s, dir, cover, accu, accu_rate)

    for s in 1..total {
        if sorted.value_of_attr(s, att_idx) == sorted.value_of_attr(s - 1, att_idx) {
            continue;
        }

        let cover_le = prefix_w[s];
        let accu_le = prefix_match[s];
        let accu_rate_le = (accu_le + 1.0) / (cover_le + 1.0);
        let gain_le = accu_le * (accu_rate_le.log2() - def_accu_rate.log2());
        if gain_le > best_gain {
            best_gain = gain_le;
            best = Some((s, Direction::Le, cover_le, accu_le, accu_rate_le));
        }

        let cover_ge = total_w - cover_le;
        let accu_ge = total_match - accu_le;
        let accu_rate_ge = (accu_ge + 1.0) / (cover_ge + 1.0);
        let gain_ge = accu_ge * (accu_rate_ge.log2() - def_accu_rate.log2());
        if gain_ge > best_gain {
            best_gain = gain_ge;
            best = Some((s, Direction::Ge, cover_ge, accu_ge, accu_rate_ge));
        }
    }

    let (s, dir, cover, accu, accu_rate) = best?;
    *split_point = sorted.value_of_attr(s - 1, att_idx);
    *direction = dir;
    *stats = AntecedentStats { max_info_gain: best_gain, accu_rate, cover, accu };

    let le_part = sorted.slice(0, s);
    let gt_part = sorted.slice(s, total - s);
    Some(vec![le_part, gt_part])
}
