//! `termjoin` implements the term-walking join filter: given a `from` field
//! and a `to` field over one or two index shards, and a subquery `Q`
//! selecting a from-side document set, it produces the set of to-side
//! documents that share at least one term value with the `from` field of
//! any document matching `Q`.
//!
//! The executor is the only hard part (see [`join`]); everything else in
//! this crate is supporting infrastructure it consumes: a postings adapter
//! that rebases per-segment doc ids into a composite space, a doc-set
//! abstraction with a dense and a sparse variant, and a merged term cursor
//! over one or many segments.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate fst;
extern crate fixedbitset;

#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate env_logger;

pub mod error;
pub mod schema;
pub mod postings;
pub mod docset;
pub mod termdict;
pub mod core;
pub mod query;
pub mod join;

pub use error::{Error, ErrorKind, Result};

/// Identifier of a document within one reader's (possibly composite) id
/// space. Always strictly less than the owning reader's `max_doc`, except
/// for the `NO_MORE_DOCS` sentinel.
pub type DocId = u32;

/// A constant-score filter never produces a score; `Score` is kept around
/// only because it threads through the `Scorer` trait shared with the rest
/// of the query engine.
pub type Score = f32;

/// Local (per-segment) ordinal of a segment within a `Searcher`.
pub type SegmentLocalId = u32;

/// Sentinel returned by `DocSet::doc()` once a stream is exhausted. Any
/// value equal to it that is reported as "real" data by a lower layer is a
/// bug in that layer, not a valid document id.
pub const NO_MORE_DOCS: DocId = DocId::max_value();
