use std::fmt;
use std::str::FromStr;

use crate::error::RfError;

/// Binary class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// The positive class.
    Positive,
    /// The negative class. Wins every tie.
    Negative,
}

impl Label {
    /// Return the lowercase textual form of the label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = RfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Label::Positive),
            "negative" => Ok(Label::Negative),
            other => Err(RfError::UnknownLabel {
                raw: other.to_string(),
            }),
        }
    }
}

/// Per-class tally of labels.
///
/// Used for node entropy, majority leaves, and ensemble votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    /// Number of `positive` labels seen.
    pub positive: usize,
    /// Number of `negative` labels seen.
    pub negative: usize,
}

impl LabelCounts {
    /// Tally an iterator of labels.
    pub fn from_labels(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut counts = Self::default();
        for label in labels {
            counts.add(label);
        }
        counts
    }

    /// Record one more occurrence of `label`.
    pub fn add(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
        }
    }

    /// Return the total number of labels counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Return the strict-majority label; equal counts resolve to `negative`.
    #[must_use]
    pub fn majority(&self) -> Label {
        if self.positive > self.negative {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Return `true` when at most one class is present.
    #[must_use]
    pub fn is_single_class(&self) -> bool {
        self.positive == 0 || self.negative == 0
    }
}
