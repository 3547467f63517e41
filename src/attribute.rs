//! Typed schema elements.
//!
//! An [`Attribute`] is a tagged variant rather than a trait object: discrete
//! and continuous attributes are a plain `enum` so `split_data`/`covers` can
//! exhaustively pattern-match instead of relying on virtual dispatch.
//!
//! Values throughout the crate are stored as `f64`: discrete values are
//! domain indices cast to `f64`, continuous values are the real measurement
//! (or seconds-since-epoch for dates). A missing value is any `f64::NAN`,
//! which lets every numeric comparison fail naturally without a separate
//! `Option` wrapper on every cell.

use chrono::{DateTime, Utc};

/// Subtype marker for a continuous attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericKind {
    Integer,
    Float,
    /// Values are seconds-since-epoch; rendered using the given `strftime`
    /// pattern.
    Date(String),
}

/// A single schema element: discrete (finite domain) or continuous.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Discrete { name: String, domain: Vec<String> },
    Continuous { name: String, kind: NumericKind },
}

impl Attribute {
    pub fn discrete(name: impl Into<String>, domain: Vec<String>) -> Self {
        Attribute::Discrete { name: name.into(), domain }
    }

    pub fn continuous(name: impl Into<String>, kind: NumericKind) -> Self {
        Attribute::Continuous { name: name.into(), kind }
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Discrete { name, .. } => name,
            Attribute::Continuous { name, .. } => name,
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Attribute::Discrete { .. })
    }

    pub fn domain(&self) -> Option<&[String]> {
        match self {
            Attribute::Discrete { domain, .. } => Some(domain),
            Attribute::Continuous { .. } => None,
        }
    }

    /// `None` for continuous attributes.
    pub fn num_values(&self) -> Option<usize> {
        self.domain().map(|d| d.len())
    }

    /// Index of `label` within a discrete domain, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.domain()?.iter().position(|v| v == label)
    }

    /// Human-readable rendering of an encoded value.
    pub fn repr_val(&self, value: f64) -> String {
        if value.is_nan() {
            return "?".to_string();
        }
        match self {
            Attribute::Discrete { domain, .. } => {
                let idx = value.round() as usize;
                domain.get(idx).cloned().unwrap_or_else(|| format!("<invalid:{idx}>"))
            }
            Attribute::Continuous { kind: NumericKind::Integer, .. } => format!("{}", value.round() as i64),
            Attribute::Continuous { kind: NumericKind::Float, .. } => format!("{value}"),
            Attribute::Continuous { kind: NumericKind::Date(pattern), .. } => {
                match DateTime::<Utc>::from_timestamp(value as i64, 0) {
                    Some(dt) => dt.format(pattern).to_string(),
                    None => format!("<invalid-date:{value}>"),
                }
            }
        }
    }

    /// Two attributes are equivalent iff same variant, name, and domain
    /// (domain order matters for discrete attributes).
    pub fn equivalent(&self, other: &Attribute) -> bool {
        self == other
    }
}
