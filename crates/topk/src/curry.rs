//! Label currying engine.
//!
//! A curried vector progressively binds a subset of its label dimensions to
//! fixed values. Each binding is kept as a `(position, value)` pair sorted by
//! schema position, and every curry step derives a fresh set from its parent,
//! so sibling views never observe each other's bindings.
//!
//! Resolution walks the schema in position order with two cursors: one over
//! the curry set, one over the caller-supplied labels. The walk enforces that
//! every schema position is bound exactly once before the codec is asked to
//! produce the final composite key.

use std::collections::HashMap;

use crate::error::{Result, TopKError};
use crate::key;

/// One label position bound to a fixed value by a currying step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CurriedLabelValue {
    pub(crate) index: usize,
    pub(crate) value: String,
}

/// Merges `labels` into the `curry` set, producing the derived set.
///
/// The result stays sorted by position and free of duplicates; the parent
/// set is never touched. Supplying a name the parent already binds is an
/// error, as is supplying a name the schema does not know (reported with the
/// exact count of unmatched names).
pub(crate) fn curry_labels(
    label_names: &[String],
    curry: &[CurriedLabelValue],
    labels: &HashMap<&str, &str>,
) -> Result<Vec<CurriedLabelValue>> {
    let mut new_curry = Vec::with_capacity(curry.len() + labels.len());
    let mut i_curry = 0;
    for (index, name) in label_names.iter().enumerate() {
        let supplied = labels.get(name.as_str());
        if i_curry < curry.len() && curry[i_curry].index == index {
            if supplied.is_some() {
                return Err(TopKError::AlreadyCurried { name: name.clone() });
            }
            new_curry.push(curry[i_curry].clone());
            i_curry += 1;
        } else if let Some(value) = supplied {
            new_curry.push(CurriedLabelValue { index, value: (*value).to_string() });
        }
        // Neither curried nor supplied: the position stays free.
    }

    let leftover = curry.len() + labels.len() - new_curry.len();
    if leftover > 0 {
        return Err(TopKError::UnknownLabels { count: leftover });
    }
    Ok(new_curry)
}

/// Resolves a composite key from a name→value map over the free positions.
///
/// Every free schema position must appear in `labels`; a curried position
/// must not. The count is validated up front so mismatches report the exact
/// deficit or surplus instead of silently truncating or padding.
pub(crate) fn composite_with_labels(
    label_names: &[String],
    curry: &[CurriedLabelValue],
    labels: &HashMap<&str, &str>,
) -> Result<String> {
    validate_label_count(labels.len(), label_names.len() - curry.len())?;

    let mut ordered = Vec::with_capacity(label_names.len());
    let mut i_curry = 0;
    for (index, name) in label_names.iter().enumerate() {
        let supplied = labels.get(name.as_str());
        if i_curry < curry.len() && curry[i_curry].index == index {
            if supplied.is_some() {
                return Err(TopKError::AlreadyCurried { name: name.clone() });
            }
            ordered.push(curry[i_curry].value.as_str());
            i_curry += 1;
        } else {
            match supplied {
                Some(value) => ordered.push(*value),
                None => return Err(TopKError::MissingLabel { name: name.clone() }),
            }
        }
    }
    Ok(key::encode(ordered))
}

/// Resolves a composite key from positional values over the free positions.
///
/// Supplied values are consumed in schema order wherever the curry set
/// leaves a position free: the caller's first value binds the first free
/// position, not the first schema position. Curried positions are skipped
/// entirely and must not be counted by the caller.
pub(crate) fn composite_with_label_values(
    label_names: &[String],
    curry: &[CurriedLabelValue],
    values: &[&str],
) -> Result<String> {
    validate_label_count(values.len(), label_names.len() - curry.len())?;

    let mut ordered = Vec::with_capacity(label_names.len());
    let (mut i_values, mut i_curry) = (0, 0);
    for index in 0..label_names.len() {
        if i_curry < curry.len() && curry[i_curry].index == index {
            ordered.push(curry[i_curry].value.as_str());
            i_curry += 1;
        } else {
            ordered.push(values[i_values]);
            i_values += 1;
        }
    }
    Ok(key::encode(ordered))
}

fn validate_label_count(got: usize, expected: usize) -> Result<()> {
    if got < expected {
        Err(TopKError::NotEnoughLabels { missing: expected - got })
    } else if got > expected {
        Err(TopKError::TooManyLabels { surplus: got - expected })
    } else {
        Ok(())
    }
}
