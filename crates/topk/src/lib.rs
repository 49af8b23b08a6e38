//! Approximate top-K metric container for Prometheus.
//!
//! Tracks the approximately most frequent (or highest-weighted) label
//! combinations in a high-cardinality observation stream and exposes them
//! through a [`prometheus::core::Collector`]: on every collection the top K
//! combinations are exported as counters, with a parallel `<metric>_error`
//! gauge family carrying the negated error bound of each estimate.
//!
//! The vector supports the usual labelled-metric surface — positional and
//! named lookups plus currying — while keeping memory proportional to the
//! configured K instead of the stream's cardinality.
//!
//! # Usage
//!
//! ```
//! use prometheus::Registry;
//! use prometheus_topk::{TopKOpts, TopKVec};
//!
//! let requests = TopKVec::new(
//!     TopKOpts::new("hot_paths", "Most requested paths.").buckets(10),
//!     &["method", "path"],
//! )
//! .unwrap();
//!
//! let registry = Registry::new();
//! registry.register(Box::new(requests.clone())).unwrap();
//!
//! requests.with_label_values(&["GET", "/index"]).inc();
//! requests.with_label_values(&["GET", "/healthz"]).observe(2.0);
//!
//! let families = registry.gather();
//! assert_eq!(families.len(), 2);
//! ```
//!
//! # Contract
//!
//! Label values must not contain the reserved separator character
//! `'\u{1f}'` used by the composite-key encoding. The contract is not
//! validated when observations are recorded; a violation aborts the
//! collection path rather than emitting samples with misaligned labels.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

mod curry;
mod key;
mod stream;
mod topk;

pub mod error;

pub use error::{Result, TopKError};
pub use topk::{TopKBucket, TopKOpts, TopKVec};
