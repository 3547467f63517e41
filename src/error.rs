//! Typed error surface for the learning/prediction core.
//!
//! A reusable learning library has a richer failure taxonomy than a CLI's
//! argument-parsing errors, so errors here are a `thiserror`-derived enum,
//! with one variant group per class: schema errors, data errors, numeric
//! anomalies, and state errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RipperError {
    #[error("class attribute must be at schema index 0")]
    WrongClassPosition,

    #[error("class attribute domain must be non-empty")]
    EmptyDomain,

    #[error("class attribute must be discrete, not continuous")]
    ContinuousClass,

    #[error("dataset schema does not match model schema: missing attributes {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("non-finite description length ({value}) while scoring rule {rule_index}")]
    NonFiniteDl { rule_index: usize, value: f64 },

    #[error("model has not been trained (empty rule list with no default rule)")]
    UninitializedModel,

    #[error("rule consequent {consequent} does not name a class in the schema")]
    RuleWithoutConsequent { consequent: usize },

    #[error("malformed model encoding: {0}")]
    Codec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
