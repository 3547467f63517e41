//! A trained, ordered ruleset ready to classify new rows.

use crate::attribute::Attribute;
use crate::dataset::Dataset;
use crate::error::RipperError;
use crate::rule::Rule;

/// Per-class confusion-matrix summary produced by [`RuleBasedModel::test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMeasures {
    pub class: usize,
    pub true_positives: f64,
    pub false_positives: f64,
    pub false_negatives: f64,
    pub true_negatives: f64,
}

impl ClassMeasures {
    pub fn precision(&self) -> f64 {
        let denom = self.true_positives + self.false_positives;
        if denom == 0.0 {
            0.0
        } else {
            self.true_positives / denom
        }
    }

    pub fn recall(&self) -> f64 {
        let denom = self.true_positives + self.false_negatives;
        if denom == 0.0 {
            0.0
        } else {
            self.true_positives / denom
        }
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

/// An ordered list of rules, each implicitly `else`-chained to the next; the
/// last rule is always the default (empty-antecedent) rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBasedModel {
    pub schema: Vec<Attribute>,
    pub rules: Vec<Rule>,
}

impl RuleBasedModel {
    pub fn new(schema: Vec<Attribute>, rules: Vec<Rule>) -> Self {
        RuleBasedModel { schema, rules }
    }

    /// Reconcile `data`'s schema against this model's schema (attribute
    /// order, domain mapping) before classifying anything against it.
    fn reconcile(&self, data: &Dataset) -> Result<Dataset, RipperError> {
        let mut reconciled = data.clone();
        reconciled.sort_attrs_as(&self.schema)?;
        Ok(reconciled)
    }

    /// Classify a single row by returning the consequent of the first rule
    /// that covers it. Assumes `data`'s schema already matches this model's.
    fn predict_row(&self, data: &Dataset, i: usize) -> Result<usize, RipperError> {
        if self.rules.is_empty() {
            return Err(RipperError::UninitializedModel);
        }
        for rule in &self.rules {
            if rule.covers(data, i) {
                return Ok(rule.consequent);
            }
        }
        // Unreachable in a well-formed model: the last rule is always the
        // default (empty-antecedent, always-covers) rule.
        Err(RipperError::UninitializedModel)
    }

    /// Classify every row in `data`, reconciling its schema against this
    /// model's first.
    pub fn predict(&self, data: &Dataset) -> Result<Vec<usize>, RipperError> {
        let reconciled = self.reconcile(data)?;
        (0..reconciled.num_instances()).map(|i| self.predict_row(&reconciled, i)).collect()
    }

    /// Confusion-matrix style per-class measures over `data`.
    pub fn test(&self, data: &Dataset) -> Result<Vec<ClassMeasures>, RipperError> {
        if self.rules.is_empty() {
            return Err(RipperError::UninitializedModel);
        }
        let reconciled = self.reconcile(data)?;
        let num_classes = reconciled.num_classes();
        let mut measures: Vec<ClassMeasures> = (0..num_classes)
            .map(|c| ClassMeasures { class: c, true_positives: 0.0, false_positives: 0.0, false_negatives: 0.0, true_negatives: 0.0 })
            .collect();

        for i in 0..reconciled.num_instances() {
            let actual = reconciled.class_value(i).round() as usize;
            let predicted = self.predict_row(&reconciled, i)?;
            let w = reconciled.weight(i);
            for m in &mut measures {
                match (m.class == predicted, m.class == actual) {
                    (true, true) => m.true_positives += w,
                    (true, false) => m.false_positives += w,
                    (false, true) => m.false_negatives += w,
                    (false, false) => m.true_negatives += w,
                }
            }
        }
        Ok(measures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antecedent::{Antecedent, AntecedentStats, Direction};
    use crate::attribute::NumericKind;
    use crate::dataset::Row;

    fn schema() -> Vec<Attribute> {
        vec![
            Attribute::discrete("play", vec!["no".into(), "yes".into()]),
            Attribute::continuous("humidity", NumericKind::Float),
        ]
    }

    fn model() -> RuleBasedModel {
        let mut yes_rule = Rule::new(1);
        yes_rule.antecedents.push(Antecedent::Continuous {
            att_idx: 1,
            split_point: 50.0,
            direction: Direction::Le,
            stats: AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 },
        });
        let default_rule = Rule::default_rule(0);
        RuleBasedModel::new(schema(), vec![yes_rule, default_rule])
    }

    #[test]
    fn predict_uses_first_covering_rule_then_default() {
        let m = model();
        let data = Dataset::new(schema(), vec![Row::new(vec![f64::NAN, 10.0]), Row::new(vec![f64::NAN, 90.0])]);
        assert_eq!(m.predict(&data).unwrap(), vec![1, 0]);
    }

    #[test]
    fn predict_errors_on_untrained_model() {
        let m = RuleBasedModel::new(schema(), Vec::new());
        let data = Dataset::new(schema(), vec![Row::new(vec![0.0, 1.0])]);
        assert!(m.predict(&data).is_err());
    }

    #[test]
    fn test_reports_perfect_classification() {
        let m = model();
        let data = Dataset::new(schema(), vec![Row::new(vec![1.0, 10.0]), Row::new(vec![0.0, 90.0])]);
        let measures = m.test(&data).unwrap();
        for cm in measures {
            assert_eq!(cm.precision(), 1.0);
            assert_eq!(cm.recall(), 1.0);
        }
    }
}
