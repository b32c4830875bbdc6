//! Example labels
//!
//! A label renders itself to the engine's external label text. The standard
//! engine labels are provided; any other label type only has to implement
//! [`Label`].

use serde::{Deserialize, Serialize};

/// Label attached to an example
pub trait Label: Send + Sync + 'static {
    /// External text for this label, placed before the first namespace
    fn to_engine_text(&self) -> String;
}

/// Regression/classification label: `label [weight [initial]]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimpleLabel {
    pub label: f32,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub initial: Option<f32>,
}

impl SimpleLabel {
    pub fn new(label: f32) -> Self {
        Self {
            label,
            weight: None,
            initial: None,
        }
    }

    pub fn weighted(label: f32, weight: f32) -> Self {
        Self {
            label,
            weight: Some(weight),
            initial: None,
        }
    }
}

impl Label for SimpleLabel {
    fn to_engine_text(&self) -> String {
        match (self.weight, self.initial) {
            (None, None) => format!("{}", self.label),
            (Some(weight), None) => format!("{} {}", self.label, weight),
            // the initial prediction is positional, so it needs a weight
            (weight, Some(initial)) => format!("{} {} {}", self.label, weight.unwrap_or(1.0), initial),
        }
    }
}

/// Contextual bandit label: `action:cost:probability`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ContextualBanditLabel {
    pub action: u32,
    pub cost: f32,
    pub probability: f32,
}

impl Label for ContextualBanditLabel {
    fn to_engine_text(&self) -> String {
        format!("{}:{}:{}", self.action, self.cost, self.probability)
    }
}

/// Label already rendered to engine text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StringLabel(pub String);

impl Label for StringLabel {
    fn to_engine_text(&self) -> String {
        self.0.clone()
    }
}

impl Label for String {
    fn to_engine_text(&self) -> String {
        self.clone()
    }
}
