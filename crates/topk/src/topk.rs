//! Approximate top-K metric vector and its collection adapter.
//!
//! A [`TopKVec`] owns one summary stream and a fixed label schema. Callers
//! resolve a [`TopKBucket`] for a concrete label combination (optionally
//! currying some labels first) and record observations through it; on
//! collection the current top entries are decoded back into label values and
//! emitted as a counter family plus a parallel error-bound gauge family
//! named `<metric>_error`.
//!
//! Locking: one mutex guards the summary stream and is held only for a
//! single insert or a single snapshot read. A second lock serializes
//! rendering snapshots into the reusable metric vectors during collection.
//! Currying and key resolution touch no shared mutable state and never lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, GaugeVec, Opts};
use tracing::{debug, trace};

use crate::curry::{self, CurriedLabelValue};
use crate::error::Result;
use crate::key;
use crate::stream::Stream;

/// Configuration for a [`TopKVec`].
///
/// Wraps the prometheus [`Opts`] the same way histogram options do and adds
/// the summary capacity. `buckets` defaults to zero, which tracks nothing;
/// set it to the number of label combinations the vector should keep
/// accurate counts for.
#[derive(Debug, Clone)]
pub struct TopKOpts {
    /// Name, help, namespace/subsystem and const labels shared by the
    /// count/error metric pair.
    pub common_opts: Opts,
    /// Number of label combinations tracked with accurate counts (the K in
    /// top-K).
    pub buckets: usize,
}

impl TopKOpts {
    /// Creates options for a metric named `name` with help text `help`.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, help: S2) -> Self {
        Self { common_opts: Opts::new(name, help), buckets: 0 }
    }

    /// Sets the namespace component of the fully qualified name.
    #[must_use]
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.common_opts.namespace = namespace.into();
        self
    }

    /// Sets the subsystem component of the fully qualified name.
    #[must_use]
    pub fn subsystem<S: Into<String>>(mut self, subsystem: S) -> Self {
        self.common_opts.subsystem = subsystem.into();
        self
    }

    /// Attaches fixed labels to every sample of both families.
    #[must_use]
    pub fn const_labels(mut self, const_labels: HashMap<String, String>) -> Self {
        self.common_opts = self.common_opts.const_labels(const_labels);
        self
    }

    /// Attaches one fixed label to every sample of both families.
    #[must_use]
    pub fn const_label<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.common_opts = self.common_opts.const_label(name, value);
        self
    }

    /// Sets the summary capacity (the K in top-K).
    #[must_use]
    pub fn buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }
}

/// Shared state behind every view of one top-K metric vector.
struct TopKCore {
    /// Guards all access to the summary stream.
    stream: Mutex<Stream>,
    /// Ordered label dimension names, fixed at construction.
    label_names: Vec<String>,
    /// Reusable render targets for collection snapshots.
    count_vec: CounterVec,
    err_vec: GaugeVec,
    /// Serializes rebuilding the render vectors during collection.
    render_lock: Mutex<()>,
    fq_name: String,
}

/// Approximate top-K metric vector.
///
/// On every collection the top `buckets` label combinations are exported as
/// counters, plus a parallel gauge family for the (negated) error bounds of
/// the estimates.
///
/// Cloning or currying produces another view of the same vector: all views
/// share one summary stream and one descriptor pair, so observations made
/// through a curried view are visible when any view is collected.
///
/// Label values must not contain the reserved separator `'\u{1f}'`. The
/// contract is not checked when observations are recorded; a violation
/// aborts the collection path instead of emitting samples with misaligned
/// labels.
#[derive(Clone)]
pub struct TopKVec {
    core: Arc<TopKCore>,
    curry: Vec<CurriedLabelValue>,
}

impl TopKVec {
    /// Creates a vector with the given options and ordered label schema.
    ///
    /// Returns an error when the prometheus client rejects the metric or
    /// label names.
    pub fn new(opts: TopKOpts, label_names: &[&str]) -> Result<Self> {
        let fq_name = opts.common_opts.fq_name();
        let err_opts = Opts::new(format!("{fq_name}_error"), opts.common_opts.help.clone())
            .const_labels(opts.common_opts.const_labels.clone());

        let count_vec = CounterVec::new(opts.common_opts.clone(), label_names)?;
        let err_vec = GaugeVec::new(err_opts, label_names)?;
        let schema: Vec<String> = label_names.iter().map(|name| (*name).to_string()).collect();

        debug!(
            metric = %fq_name,
            labels = schema.len(),
            buckets = opts.buckets,
            "created top-k metric vector"
        );

        Ok(Self {
            core: Arc::new(TopKCore {
                stream: Mutex::new(Stream::new(opts.buckets)),
                label_names: schema,
                count_vec,
                err_vec,
                render_lock: Mutex::new(()),
                fq_name,
            }),
            curry: Vec::new(),
        })
    }

    /// Returns a view of this vector with `labels` bound to fixed values.
    ///
    /// The returned vector shares the summary with its parent but holds an
    /// independent curry set; further currying never affects the parent.
    /// Errors if a supplied name is unknown to the schema or already bound
    /// by an earlier curry step.
    pub fn curry_with(&self, labels: &HashMap<&str, &str>) -> Result<Self> {
        let curried = curry::curry_labels(&self.core.label_names, &self.curry, labels)?;
        Ok(Self { core: Arc::clone(&self.core), curry: curried })
    }

    /// Panicking variant of [`TopKVec::curry_with`].
    pub fn must_curry_with(&self, labels: &HashMap<&str, &str>) -> Self {
        match self.curry_with(labels) {
            Ok(vec) => vec,
            Err(err) => panic!("{err}"),
        }
    }

    /// Resolves a bucket for the label combination given as a name→value
    /// map over the free (non-curried) label positions.
    pub fn get_metric_with(&self, labels: &HashMap<&str, &str>) -> Result<TopKBucket> {
        let composite = curry::composite_with_labels(&self.core.label_names, &self.curry, labels)?;
        Ok(TopKBucket { key: composite, core: Arc::clone(&self.core) })
    }

    /// Resolves a bucket for the label combination given as positional
    /// values.
    ///
    /// Values are consumed in schema order over the free positions only:
    /// with schema `["region", "path"]` curried on `region`, the single
    /// expected value binds `path`.
    pub fn get_metric_with_label_values(&self, values: &[&str]) -> Result<TopKBucket> {
        let composite =
            curry::composite_with_label_values(&self.core.label_names, &self.curry, values)?;
        Ok(TopKBucket { key: composite, core: Arc::clone(&self.core) })
    }

    /// Panicking variant of [`TopKVec::get_metric_with`].
    pub fn with(&self, labels: &HashMap<&str, &str>) -> TopKBucket {
        match self.get_metric_with(labels) {
            Ok(bucket) => bucket,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking variant of [`TopKVec::get_metric_with_label_values`].
    pub fn with_label_values(&self, values: &[&str]) -> TopKBucket {
        match self.get_metric_with_label_values(values) {
            Ok(bucket) => bucket,
            Err(err) => panic!("{err}"),
        }
    }
}

impl fmt::Debug for TopKVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopKVec")
            .field("name", &self.core.fq_name)
            .field("labels", &self.core.label_names)
            .field("curried", &self.curry.len())
            .finish()
    }
}

/// Handle bound to one fully resolved label combination.
///
/// Buckets are cheap to create and hold nothing beyond their composite key
/// and a shared reference to the vector; they are created per lookup, never
/// cached, and safe to drop at any time.
#[derive(Clone)]
pub struct TopKBucket {
    key: String,
    core: Arc<TopKCore>,
}

impl TopKBucket {
    /// Records an observation with the given weight.
    ///
    /// NaN weights are recorded as zero so they cannot disturb the
    /// summary's internal ordering.
    pub fn observe(&self, weight: f64) {
        let weight = if weight.is_nan() { 0.0 } else { weight };
        self.core.stream.lock().insert(&self.key, weight);
    }

    /// Records an observation with weight 1.
    pub fn inc(&self) {
        self.observe(1.0);
    }
}

impl fmt::Debug for TopKBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopKBucket")
            .field("metric", &self.core.fq_name)
            .field("key", &self.key)
            .finish()
    }
}

impl Collector for TopKVec {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.core.count_vec.desc();
        descs.extend(self.core.err_vec.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // Snapshot under the stream lock only; decoding is lock-free.
        let entries = self.core.stream.lock().keys();

        let _render = self.core.render_lock.lock();
        self.core.count_vec.reset();
        self.core.err_vec.reset();
        for entry in &entries {
            let values = match key::decode(&entry.key, self.core.label_names.len()) {
                Ok(values) => values,
                // A mismatch means a label value contained the reserved
                // separator or the stream state is corrupt; emitting the
                // entry would attach the wrong label values.
                Err(err) => panic!("corrupt key in top-k metric {:?}: {err}", self.core.fq_name),
            };
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            self.core.count_vec.with_label_values(&values).inc_by(entry.count);
            // The stored bound is an overcount; surface it as a correction.
            self.core.err_vec.with_label_values(&values).set(-entry.error);
        }
        trace!(metric = %self.core.fq_name, entries = entries.len(), "collected top-k snapshot");

        let mut families = self.core.count_vec.collect();
        families.extend(self.core.err_vec.collect());
        families
    }
}
