use std::collections::HashSet;

use crate::label::{Label, LabelCounts};
use crate::node::AttributeIndex;
use crate::record::Record;

/// Binary Shannon entropy of a label tally, in bits.
///
/// Returns `0.0` when the tally is empty or holds a single class.
/// Otherwise `-p·log2(p) - (1-p)·log2(1-p)` with `p` the positive fraction.
#[must_use]
pub fn entropy(counts: LabelCounts) -> f64 {
    if counts.is_single_class() {
        return 0.0;
    }
    let total = counts.total() as f64;
    let positive = counts.positive as f64 / total;
    let negative = counts.negative as f64 / total;
    -(positive * positive.log2() + negative * negative.log2())
}

/// Tally the labels of a record set.
pub(crate) fn label_counts(records: &[&Record]) -> LabelCounts {
    LabelCounts::from_labels(records.iter().map(|r| r.label()))
}

/// Return the shared label when every record carries the same one.
///
/// Scans once and stops at the first mismatch. `None` for an empty set.
pub(crate) fn uniform_label(records: &[&Record]) -> Option<Label> {
    let first = records.first()?.label();
    records
        .iter()
        .all(|r| r.label() == first)
        .then_some(first)
}

/// Distinct values of one attribute column, in order of first appearance.
///
/// Callers guarantee every record is indexable at `attribute`.
pub(crate) fn distinct_values<'a>(records: &[&'a Record], attribute: usize) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        let value = record.attributes()[attribute].as_str();
        if seen.insert(value) {
            values.push(value);
        }
    }
    values
}

/// The winning split for a record set.
#[derive(Debug, Clone)]
pub(crate) struct BestSplit<'a> {
    /// Attribute tested by the split.
    pub(crate) attribute: AttributeIndex,
    /// Records equal to this value go left.
    pub(crate) value: &'a str,
    /// Information gain of the split; always strictly positive.
    pub(crate) gain: f64,
    /// Records whose value equals `value`.
    pub(crate) left: Vec<&'a Record>,
    /// All remaining records.
    pub(crate) right: Vec<&'a Record>,
}

/// Find the `(attribute, value)` equality split with the greatest information gain.
///
/// Candidates are visited in `attributes` order, then value first-appearance
/// order. A candidate replaces the incumbent only when its gain is strictly
/// greater, starting from `0.0`, so ties keep the earliest candidate.
///
/// Gain is `H(parent) - (|L|/|N|·H(L) + |R|/|N|·H(R))`, without any
/// split-information normalization.
///
/// Returns `None` when no candidate has positive gain.
pub(crate) fn find_best_split<'a>(
    records: &[&'a Record],
    attributes: &[usize],
) -> Option<BestSplit<'a>> {
    if records.is_empty() {
        return None;
    }

    let parent = label_counts(records);
    let parent_entropy = entropy(parent);
    let n = records.len() as f64;

    let mut best_gain = 0.0;
    let mut best: Option<(usize, &'a str)> = None;

    for &attribute in attributes {
        for value in distinct_values(records, attribute) {
            let mut left = LabelCounts::default();
            for record in records {
                if record.attributes()[attribute] == value {
                    left.add(record.label());
                }
            }
            let right = LabelCounts {
                positive: parent.positive - left.positive,
                negative: parent.negative - left.negative,
            };

            let left_ratio = left.total() as f64 / n;
            let right_ratio = right.total() as f64 / n;
            let gain =
                parent_entropy - (left_ratio * entropy(left) + right_ratio * entropy(right));

            if gain > best_gain {
                best_gain = gain;
                best = Some((attribute, value));
            }
        }
    }

    let (attribute, value) = best?;
    let (left, right): (Vec<&Record>, Vec<&Record>) = records
        .iter()
        .copied()
        .partition(|r| r.attributes()[attribute] == value);

    Some(BestSplit {
        attribute: AttributeIndex::new(attribute),
        value,
        gain: best_gain,
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: Label, attrs: &[&str]) -> Record {
        Record::new(label, attrs.iter().map(|s| s.to_string()).collect())
    }

    fn refs(records: &[Record]) -> Vec<&Record> {
        records.iter().collect()
    }

    #[test]
    fn entropy_empty_is_zero() {
        assert_eq!(entropy(LabelCounts::default()), 0.0);
    }

    #[test]
    fn entropy_single_class_is_zero() {
        assert_eq!(entropy(LabelCounts { positive: 7, negative: 0 }), 0.0);
        assert_eq!(entropy(LabelCounts { positive: 0, negative: 3 }), 0.0);
    }

    #[test]
    fn entropy_balanced_is_one() {
        assert_eq!(entropy(LabelCounts { positive: 1, negative: 1 }), 1.0);
        assert_eq!(entropy(LabelCounts { positive: 50, negative: 50 }), 1.0);
    }

    #[test]
    fn entropy_skewed() {
        // p = 0.25: -(0.25·log2 0.25 + 0.75·log2 0.75) ≈ 0.811278
        let h = entropy(LabelCounts { positive: 1, negative: 3 });
        assert!((h - 0.811_278_124_459_132_8).abs() < 1e-12);
    }

    #[test]
    fn uniform_label_detection() {
        let same = vec![
            record(Label::Positive, &["a"]),
            record(Label::Positive, &["b"]),
        ];
        let mixed = vec![
            record(Label::Positive, &["a"]),
            record(Label::Negative, &["b"]),
        ];
        assert_eq!(uniform_label(&refs(&same)), Some(Label::Positive));
        assert_eq!(uniform_label(&refs(&mixed)), None);
        assert_eq!(uniform_label(&[]), None);
    }

    #[test]
    fn distinct_values_first_appearance_order() {
        let records = vec![
            record(Label::Positive, &["o"]),
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["o"]),
            record(Label::Negative, &["b"]),
        ];
        assert_eq!(distinct_values(&refs(&records), 0), vec!["o", "x", "b"]);
    }

    #[test]
    fn separable_split_found() {
        let records = vec![
            record(Label::Positive, &["x"]),
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["y"]),
        ];
        let split = find_best_split(&refs(&records), &[0]).expect("should split");
        assert_eq!(split.attribute.index(), 0);
        assert_eq!(split.value, "x");
        assert!(split.gain > 0.0);
        assert_eq!(split.left.len(), 2);
        assert_eq!(split.right.len(), 1);
        assert!(split.left.iter().all(|r| r.label() == Label::Positive));
        assert!(split.right.iter().all(|r| r.label() == Label::Negative));
    }

    #[test]
    fn pure_set_has_no_split() {
        let records = vec![
            record(Label::Positive, &["x", "a"]),
            record(Label::Positive, &["y", "b"]),
        ];
        assert!(find_best_split(&refs(&records), &[0, 1]).is_none());
    }

    #[test]
    fn constant_attribute_has_no_split() {
        let records = vec![
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["x"]),
        ];
        assert!(find_best_split(&refs(&records), &[0]).is_none());
    }

    #[test]
    fn xor_has_zero_gain() {
        // Every single-attribute equality split leaves both sides 50/50.
        let records = vec![
            record(Label::Negative, &["0", "0"]),
            record(Label::Positive, &["0", "1"]),
            record(Label::Positive, &["1", "0"]),
            record(Label::Negative, &["1", "1"]),
        ];
        assert!(find_best_split(&refs(&records), &[0, 1]).is_none());
    }

    #[test]
    fn empty_attribute_set_has_no_split() {
        let records = vec![
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["y"]),
        ];
        assert!(find_best_split(&refs(&records), &[]).is_none());
    }

    #[test]
    fn tie_keeps_first_attribute() {
        // Attributes 0 and 1 separate the labels equally well.
        let records = vec![
            record(Label::Positive, &["a", "c"]),
            record(Label::Negative, &["b", "d"]),
        ];
        let split = find_best_split(&refs(&records), &[0, 1]).unwrap();
        assert_eq!(split.attribute.index(), 0);
        assert_eq!(split.value, "a");

        let split = find_best_split(&refs(&records), &[1, 0]).unwrap();
        assert_eq!(split.attribute.index(), 1);
        assert_eq!(split.value, "c");
    }

    #[test]
    fn tie_keeps_first_value() {
        // On a binary column "a"-vs-rest and "b"-vs-rest are the same split.
        let records = vec![
            record(Label::Negative, &["b"]),
            record(Label::Positive, &["a"]),
        ];
        let split = find_best_split(&refs(&records), &[0]).unwrap();
        assert_eq!(split.value, "b");
        assert_eq!(split.left[0].label(), Label::Negative);
    }

    #[test]
    fn higher_gain_beats_earlier_candidate() {
        // Attribute 0 separates imperfectly, attribute 1 perfectly.
        let records = vec![
            record(Label::Positive, &["a", "p"]),
            record(Label::Positive, &["a", "p"]),
            record(Label::Negative, &["a", "n"]),
            record(Label::Negative, &["b", "n"]),
        ];
        let split = find_best_split(&refs(&records), &[0, 1]).unwrap();
        assert_eq!(split.attribute.index(), 1);
        assert_eq!(split.value, "p");
        assert!((split.gain - 1.0).abs() < 1e-12);
    }
}
