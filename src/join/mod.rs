//! The term-walking join executor: spec.md's core. Five cooperating
//! pieces, leaves-first:
//!
//! - [`thresholds`] — the three routing thresholds, derived once per
//!   invocation (spec §4.6).
//! - [`classify`] — the From-Side Classifier (spec §4.4).
//! - [`accumulate`] — the To-Side Accumulator (spec §4.5).
//! - [`driver`] — the outer state machine threading the two together
//!   across both term dictionaries (spec §4.7).
//! - [`query`] — wires the executor into the `Query`/`Weight`/`Scorer`
//!   family as a constant-score filter (spec §6.2).
//!
//! [`testkit`] is test-only infrastructure: an in-memory searcher fixture
//! sufficient to exercise the executor without a full index-writer
//! pipeline.

pub mod accumulate;
pub mod classify;
pub mod driver;
pub mod query;
pub mod thresholds;

#[cfg(test)]
pub mod testkit;

pub use self::query::{JoinScorer, JoinQuery, JoinWeight};
pub use self::thresholds::JoinThresholds;

use schema::Field;

/// Configuration consumed at construction (spec §6.1). `Q`, the subquery
/// defining the from-side set, travels alongside this as a boxed
/// `query::Query` rather than as a field here, since `JoinQuery::new` takes
/// it directly.
#[derive(Clone, Debug)]
pub struct JoinConfig {
    pub from_field: Field,
    pub to_field: Field,
    /// Shard/core name to resolve the from-side searcher from, if this is
    /// a cross-shard join. `None` means from and to share a core.
    pub from_index: Option<String>,
}

/// Diagnostic counters accumulated across one invocation and emitted to
/// the debug sink under the `"join"` label when enabled (spec §6.4). Every
/// field here is discarded, not surfaced, if the join fails partway
/// through (spec §7).
#[derive(Debug, Default, Clone)]
pub struct JoinCounters {
    pub elapsed_ms: u64,
    pub from_set_size: usize,
    pub to_set_size: usize,
    pub from_term_count: u64,
    pub from_term_total_df: u64,
    pub from_term_direct_count: u64,
    pub from_term_hits: u64,
    pub from_term_hits_total_df: u64,
    pub to_term_hits: u64,
    pub to_term_hits_total_df: u64,
    pub to_term_direct_count: u64,
    pub small_sets_deferred: u64,
    pub to_set_docs_added: u64,
}
