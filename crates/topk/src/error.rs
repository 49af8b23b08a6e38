//! Error types for the top-K metric container.

use thiserror::Error;

/// Result alias used by the fallible entry points of this crate.
pub type Result<T> = std::result::Result<T, TopKError>;

/// Errors surfaced by the fallible metric-vector entry points.
///
/// Every variant except [`TopKError::KeyFieldMismatch`] is a usage error the
/// caller can recover from by fixing the label set it supplied. The panicking
/// companions (`with`, `with_label_values`, `must_curry_with`) convert the
/// same values into an abort, matching call sites whose label schemas are
/// statically known.
#[derive(Debug, Error)]
pub enum TopKError {
    /// A label bound by an earlier curry step was supplied again.
    #[error("label name {name:?} is already curried")]
    AlreadyCurried {
        /// The doubly bound label name.
        name: String,
    },

    /// Label names not present in the schema were supplied during currying.
    #[error("{count} unknown label(s) found during currying")]
    UnknownLabels {
        /// How many supplied names matched no schema position.
        count: usize,
    },

    /// A schema position was neither curried nor supplied at resolution.
    #[error("label name {name:?} missing in label map")]
    MissingLabel {
        /// The unresolved label name.
        name: String,
    },

    /// Fewer free label values were supplied than the schema has free
    /// positions.
    #[error("not enough labels (missing {missing})")]
    NotEnoughLabels {
        /// How many values are still required.
        missing: usize,
    },

    /// More free label values were supplied than the schema has free
    /// positions.
    #[error("received {surplus} unrecognized label(s)")]
    TooManyLabels {
        /// How many values had no free position to bind to.
        surplus: usize,
    },

    /// A composite key did not decode back to the schema's field count.
    ///
    /// This can only arise from a label value containing the reserved
    /// separator (see [`crate::TopKVec`]) or from corrupted summary state.
    /// It is never caller-recoverable; the collection path converts it into
    /// an abort rather than emit samples with misaligned labels.
    #[error("composite key decoded to {actual} field(s), expected {expected}")]
    KeyFieldMismatch {
        /// Field count demanded by the schema.
        expected: usize,
        /// Field count actually present in the key.
        actual: usize,
    },

    /// Descriptor construction was rejected by the prometheus client.
    #[error(transparent)]
    Prometheus(#[from] prometheus::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that the user-facing error strings keep the exact wording
    /// call sites and operators grep for.
    #[test]
    fn display_wording() {
        assert_eq!(
            TopKError::AlreadyCurried { name: "region".into() }.to_string(),
            "label name \"region\" is already curried"
        );
        assert_eq!(
            TopKError::UnknownLabels { count: 2 }.to_string(),
            "2 unknown label(s) found during currying"
        );
        assert_eq!(
            TopKError::MissingLabel { name: "path".into() }.to_string(),
            "label name \"path\" missing in label map"
        );
        assert_eq!(
            TopKError::NotEnoughLabels { missing: 1 }.to_string(),
            "not enough labels (missing 1)"
        );
        assert_eq!(
            TopKError::TooManyLabels { surplus: 3 }.to_string(),
            "received 3 unrecognized label(s)"
        );
        assert_eq!(
            TopKError::KeyFieldMismatch { expected: 2, actual: 3 }.to_string(),
            "composite key decoded to 3 field(s), expected 2"
        );
    }
}
