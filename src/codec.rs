//! Hand-rolled text encoding for a trained model.
//!
//! No `serde` dependency: the save/load format is parsed and written by hand,
//! line-oriented, with a magic line, a counted schema section, and a counted
//! rule section, each field tab-separated.

use crate::antecedent::{Antecedent, AntecedentStats, Direction};
use crate::attribute::{Attribute, NumericKind};
use crate::error::RipperError;
use crate::model::RuleBasedModel;
use crate::rule::Rule;

const MAGIC: &str = "RIPPER1";

pub fn encode(model: &RuleBasedModel) -> String {
    let mut out = String::new();
    out.push_str(MAGIC);
    out.push('\n');

    out.push_str(&format!("{}\n", model.schema.len()));
    for attr in &model.schema {
        out.push_str(&encode_attr(attr));
        out.push('\n');
    }

    out.push_str(&format!("{}\n", model.rules.len()));
    for rule in &model.rules {
        out.push_str(&encode_rule(rule));
        out.push('\n');
    }
    out
}

pub fn decode(text: &str) -> Result<RuleBasedModel, RipperError> {
    let mut lines = text.lines();
    let magic = lines.next().ok_or_else(|| RipperError::Codec("empty input".into()))?;
    if magic != MAGIC {
        return Err(RipperError::Codec(format!("unrecognized magic {magic:?}")));
    }

    let num_attrs: usize = next_usize(&mut lines, "attribute count")?;
    let mut schema = Vec::with_capacity(num_attrs);
    for _ in 0..num_attrs {
        let line = lines.next().ok_or_else(|| RipperError::Codec("missing attribute line".into()))?;
        schema.push(decode_attr(line)?);
    }

    let num_rules: usize = next_usize(&mut lines, "rule count")?;
    let mut rules = Vec::with_capacity(num_rules);
    for _ in 0..num_rules {
        let line = lines.next().ok_or_else(|| RipperError::Codec("missing rule line".into()))?;
        rules.push(decode_rule(line, &schema)?);
    }

    Ok(RuleBasedModel::new(schema, rules))
}

fn next_usize<'a>(lines: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<usize, RipperError> {
    lines
        .next()
        .ok_or_else(|| RipperError::Codec(format!("missing {what}")))?
        .trim()
        .parse()
        .map_err(|_| RipperError::Codec(format!("malformed {what}")))
}

fn encode_attr(attr: &Attribute) -> String {
    match attr {
        Attribute::Discrete { name, domain } => format!("D\t{name}\t{}", domain.join(",")),
        Attribute::Continuous { name, kind } => match kind {
            NumericKind::Integer => format!("C\t{name}\tI"),
            NumericKind::Float => format!("C\t{name}\tF"),
            NumericKind::Date(pattern) => format!("C\t{name}\tT:{pattern}"),
        },
    }
}

fn decode_attr(line: &str) -> Result<Attribute, RipperError> {
    let mut parts = line.splitn(3, '\t');
    let tag = parts.next().ok_or_else(|| RipperError::Codec("missing attribute tag".into()))?;
    let name = parts.next().ok_or_else(|| RipperError::Codec("missing attribute name".into()))?;
    let rest = parts.next().ok_or_else(|| RipperError::Codec("missing attribute body".into()))?;

    match tag {
        "D" => {
            let domain = rest.split(',').map(str::to_string).collect();
            Ok(Attribute::discrete(name, domain))
        }
        "C" => {
            let kind = if rest == "I" {
                NumericKind::Integer
            } else if rest == "F" {
                NumericKind::Float
            } else if let Some(pattern) = rest.strip_prefix("T:") {
                NumericKind::Date(pattern.to_string())
            } else {
                return Err(RipperError::Codec(format!("malformed continuous kind {rest:?}")));
            };
            Ok(Attribute::continuous(name, kind))
        }
        other => Err(RipperError::Codec(format!("unknown attribute tag {other:?}"))),
    }
}

fn encode_rule(rule: &Rule) -> String {
    let conds: Vec<String> = rule.antecedents.iter().map(encode_antecedent).collect();
    format!("{}\t{}", rule.consequent, conds.join(";"))
}

fn decode_rule(line: &str, schema: &[Attribute]) -> Result<Rule, RipperError> {
    let mut parts = line.splitn(2, '\t');
    let consequent: usize = parts
        .next()
        .ok_or_else(|| RipperError::Codec("missing rule consequent".into()))?
        .parse()
        .map_err(|_| RipperError::Codec("malformed rule consequent".into()))?;
    let rest = parts.next().unwrap_or("");

    let num_classes = schema.first().and_then(|a| a.num_values()).unwrap_or(0);
    if consequent >= num_classes {
        return Err(RipperError::RuleWithoutConsequent { consequent });
    }

    let mut antecedents = Vec::new();
    for cond in rest.split(';').filter(|s| !s.is_empty()) {
        antecedents.push(decode_antecedent(cond, schema)?);
    }
    Ok(Rule { consequent, antecedents })
}

fn encode_antecedent(a: &Antecedent) -> String {
    match a {
        Antecedent::Discrete { att_idx, target, .. } => format!("D{att_idx}={target}"),
        Antecedent::Continuous { att_idx, split_point, direction, .. } => {
            let op = match direction {
                Direction::Le => "<=",
                Direction::Ge => ">=",
            };
            format!("C{att_idx}{op}{split_point}")
        }
    }
}

fn decode_antecedent(s: &str, schema: &[Attribute]) -> Result<Antecedent, RipperError> {
    let unset = AntecedentStats { max_info_gain: f64::NAN, accu_rate: f64::NAN, cover: 0.0, accu: 0.0 };
    if let Some(rest) = s.strip_prefix('D') {
        let (idx_str, target_str) = rest.split_once('=').ok_or_else(|| RipperError::Codec(format!("malformed discrete antecedent {s:?}")))?;
        let att_idx: usize = idx_str.parse().map_err(|_| RipperError::Codec(format!("malformed attribute index in {s:?}")))?;
        let target: usize = target_str.parse().map_err(|_| RipperError::Codec(format!("malformed target in {s:?}")))?;
        validate_attr_idx(schema, att_idx, true)?;
        return Ok(Antecedent::Discrete { att_idx, target, stats: unset });
    }
    if let Some(rest) = s.strip_prefix('C') {
        let (idx_str, remainder, direction) = if let Some((a, b)) = rest.split_once("<=") {
            (a, b, Direction::Le)
        } else if let Some((a, b)) = rest.split_once(">=") {
            (a, b, Direction::Ge)
        } else {
            return Err(RipperError::Codec(format!("malformed continuous antecedent {s:?}")));
        };
        let att_idx: usize = idx_str.parse().map_err(|_| RipperError::Codec(format!("malformed attribute index in {s:?}")))?;
        let split_point: f64 = remainder.parse().map_err(|_| RipperError::Codec(format!("malformed split point in {s:?}")))?;
        validate_attr_idx(schema, att_idx, false)?;
        return Ok(Antecedent::Continuous { att_idx, split_point, direction, stats: unset });
    }
    Err(RipperError::Codec(format!("unrecognized antecedent {s:?}")))
}

fn validate_attr_idx(schema: &[Attribute], att_idx: usize, want_discrete: bool) -> Result<(), RipperError> {
    match schema.get(att_idx) {
        Some(attr) if attr.is_discrete() == want_discrete => Ok(()),
        Some(_) => Err(RipperError::Codec(format!("attribute {att_idx} has unexpected kind"))),
        None => Err(RipperError::Codec(format!("attribute index {att_idx} out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, NumericKind};

    fn sample_model() -> RuleBasedModel {
        let schema = vec![
            Attribute::discrete("play", vec!["no".into(), "yes".into()]),
            Attribute::discrete("outlook", vec!["sunny".into(), "overcast".into(), "rain".into()]),
            Attribute::continuous("humidity", NumericKind::Float),
        ];
        let unset = AntecedentStats { max_info_gain: f64::NAN, accu_rate: f64::NAN, cover: 0.0, accu: 0.0 };
        let mut rule = Rule::new(1);
        rule.antecedents.push(Antecedent::Discrete { att_idx: 1, target: 0, stats: unset });
        rule.antecedents.push(Antecedent::Continuous { att_idx: 2, split_point: 75.0, direction: Direction::Le, stats: unset });
        RuleBasedModel::new(schema, vec![rule, Rule::default_rule(0)])
    }

    #[test]
    fn round_trips_a_model() {
        let model = sample_model();
        let text = encode(&model);
        let decoded = decode(&text).expect("should decode");
        assert_eq!(decoded.schema, model.schema);
        assert_eq!(decoded.rules, model.rules);
    }

    #[test]
    fn rejects_bad_magic() {
        let err = decode("NOTRIPPER\n").unwrap_err();
        assert!(matches!(err, RipperError::Codec(_)));
    }

    #[test]
    fn rejects_out_of_range_attribute_index() {
        let malformed = "RIPPER1\n1\nD\tplay\tno,yes\n1\n0\tD5=0\n";
        let err = decode(malformed).unwrap_err();
        assert!(matches!(err, RipperError::Codec(_)));
    }

    #[test]
    fn rejects_rule_with_out_of_range_consequent() {
        let malformed = "RIPPER1\n1\nD\tplay\tno,yes\n1\n7\t\n";
        let err = decode(malformed).unwrap_err();
        assert!(matches!(err, RipperError::RuleWithoutConsequent { consequent: 7 }));
    }
}
