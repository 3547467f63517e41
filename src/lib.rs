//! A RIPPER (Repeated Incremental Pruning to Produce Error Reduction)
//! rule-learning engine: learns ordered IF-THEN rulesets from labeled
//! tabular data and applies them to unseen rows.
//!
//! The public surface is intentionally small: build a [`Dataset`] from a
//! schema and rows, hand it to a [`RipperLearner`], and use the resulting
//! [`RuleBasedModel`] to [`RuleBasedModel::predict`] or
//! [`RuleBasedModel::test`]. Everything else (antecedent scoring, rule
//! growth/pruning, description-length bookkeeping) is an implementation
//! detail exposed for embedding applications that want finer control.

pub mod antecedent;
pub mod attribute;
pub mod codec;
pub mod csv_source;
pub mod dataset;
pub mod error;
pub mod learner;
pub mod log;
pub mod model;
pub mod report;
pub mod rng;
pub mod rule;
pub mod rule_stats;

pub use antecedent::{Antecedent, AntecedentStats, Direction};
pub use attribute::{Attribute, NumericKind};
pub use dataset::{Dataset, Row};
pub use error::RipperError;
pub use learner::{RipperConfig, RipperLearner};
pub use log::{NullLog, TrainLog, TracingLog};
pub use model::{ClassMeasures, RuleBasedModel};
pub use rule::Rule;
pub use rule_stats::{RuleMetrics, RuleStats};

/// Train a ruleset with the default configuration and no progress
/// reporting.
pub fn train(data: Dataset) -> Result<RuleBasedModel, RipperError> {
    RipperLearner::new(RipperConfig::default()).train(data)
}

/// Train a ruleset with an explicit configuration and progress log.
pub fn train_with_log(data: Dataset, config: RipperConfig, log: &dyn TrainLog) -> Result<RuleBasedModel, RipperError> {
    RipperLearner::new(config).train_with_log(data, log)
}
