use ripper_core::attribute::{Attribute, NumericKind};
use ripper_core::dataset::{Dataset, Row};
use ripper_core::{RipperConfig, RipperLearner};

fn weather_schema() -> Vec<Attribute> {
    vec![
        Attribute::discrete("play", vec!["no".into(), "yes".into()]),
        Attribute::discrete("outlook", vec!["sunny".into(), "overcast".into(), "rain".into()]),
        Attribute::continuous("humidity", NumericKind::Float),
        Attribute::continuous("temperature", NumericKind::Float),
    ]
}

fn weather_rows() -> Vec<Row> {
    vec![
        Row::new(vec![0.0, 0.0, 85.0, 85.0]),
        Row::new(vec![0.0, 0.0, 90.0, 80.0]),
        Row::new(vec![1.0, 1.0, 78.0, 83.0]),
        Row::new(vec![1.0, 2.0, 96.0, 70.0]),
        Row::new(vec![1.0, 2.0, 80.0, 68.0]),
        Row::new(vec![0.0, 2.0, 70.0, 65.0]),
        Row::new(vec![1.0, 1.0, 65.0, 64.0]),
        Row::new(vec![0.0, 0.0, 95.0, 72.0]),
        Row::new(vec![1.0, 0.0, 70.0, 69.0]),
        Row::new(vec![1.0, 2.0, 80.0, 75.0]),
        Row::new(vec![1.0, 0.0, 70.0, 75.0]),
        Row::new(vec![1.0, 1.0, 90.0, 72.0]),
        Row::new(vec![1.0, 1.0, 70.0, 81.0]),
        Row::new(vec![0.0, 2.0, 91.0, 71.0]),
    ]
}

#[test]
fn weather_play_trains_and_predicts_in_domain() {
    let data = Dataset::new(weather_schema(), weather_rows());
    let model = RipperLearner::new(RipperConfig::default()).train(data.clone()).unwrap();

    let predictions = model.predict(&data).unwrap();
    for predicted in predictions {
        assert!(predicted < data.num_classes());
    }
    assert!(model.rules.last().unwrap().is_default());
}

#[test]
fn perfectly_separable_data_is_learned_without_error() {
    // class = 1 iff x > 10.
    let schema = vec![
        Attribute::discrete("class", vec!["low".into(), "high".into()]),
        Attribute::continuous("x", NumericKind::Float),
    ];
    let rows: Vec<Row> = (0..40)
        .map(|i| {
            let x = i as f64;
            let class = if x > 10.0 { 1.0 } else { 0.0 };
            Row::new(vec![class, x])
        })
        .collect();
    let data = Dataset::new(schema, rows);
    let model = RipperLearner::new(RipperConfig::default()).train(data.clone()).unwrap();
    let measures = model.test(&data).unwrap();
    for m in measures {
        assert!(m.f1() > 0.9, "expected near-perfect separation, got f1={}", m.f1());
    }
}

#[test]
fn noisy_parity_data_still_trains_to_a_usable_default_model() {
    // XOR-like target: no single attribute predicts the class, so RIPPER
    // should fall back to growing very little and leaning on the default
    // rule rather than panicking or looping forever.
    let schema = vec![
        Attribute::discrete("class", vec!["a".into(), "b".into()]),
        Attribute::discrete("p", vec!["0".into(), "1".into()]),
        Attribute::discrete("q", vec!["0".into(), "1".into()]),
    ];
    let rows: Vec<Row> = (0..16)
        .map(|i| {
            let p = (i % 2) as f64;
            let q = ((i / 2) % 2) as f64;
            let class = ((p as i64) ^ (q as i64)) as f64;
            Row::new(vec![class, p, q])
        })
        .collect();
    let data = Dataset::new(schema, rows);
    let model = RipperLearner::new(RipperConfig::default()).train(data).unwrap();
    assert!(!model.rules.is_empty());
}

#[test]
fn training_is_deterministic_across_runs() {
    let data = Dataset::new(weather_schema(), weather_rows());
    let config = RipperConfig { seed: 99, ..RipperConfig::default() };
    let a = RipperLearner::new(config).train(data.clone()).unwrap();
    let b = RipperLearner::new(config).train(data).unwrap();
    assert_eq!(a, b);
}

#[test]
fn default_rule_always_terminates_the_ruleset() {
    let data = Dataset::new(weather_schema(), weather_rows());
    let model = RipperLearner::new(RipperConfig::default()).train(data).unwrap();
    assert!(model.rules.last().unwrap().is_default());
    // Every row matches something, since the default rule covers everything.
    assert!(model.rules.iter().any(|r| r.is_default()));
}

#[test]
fn cleanup_removes_redundant_continuous_antecedents() {
    use ripper_core::antecedent::{Antecedent, AntecedentStats, Direction};
    use ripper_core::rule::Rule;

    let schema = vec![
        Attribute::discrete("class", vec!["a".into(), "b".into()]),
        Attribute::continuous("x", NumericKind::Float),
    ];
    let data = Dataset::create_empty(schema);
    let stats = AntecedentStats { max_info_gain: 0.0, accu_rate: 0.0, cover: 0.0, accu: 0.0 };
    let mut rule = Rule::new(0);
    rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 10.0, direction: Direction::Le, stats });
    rule.antecedents.push(Antecedent::Continuous { att_idx: 1, split_point: 20.0, direction: Direction::Le, stats });
    rule.clean_up(&data);
    assert_eq!(rule.antecedents.len(), 1);
    match &rule.antecedents[0] {
        Antecedent::Continuous { split_point, .. } => assert_eq!(*split_point, 10.0),
        _ => panic!("expected continuous antecedent"),
    }
}
