//! The `Query`/`Weight`/`Scorer` trait family the join filter plugs into
//! (spec §6.2, §6.3). Query parsing and the surrounding filter plugin
//! surface are out of scope (spec §1); what's here is the minimal trait
//! family the rest of the pack's `Query` implementations already follow,
//! grounded directly on the teacher's `AllQuery`/`AllWeight`/`AllScorer`.

mod all_query;

pub use self::all_query::{AllQuery, AllScorer, AllWeight};

use core::{SegmentReader, Searcher};
use error::Result;
use postings::DocSet;
use std::any::Any;
use Score;

/// A query: something that can be turned into a `Weight` against a given
/// searcher. Queries are stateless and reusable across searchers. Not
/// `Send`/`Sync`: spec §5 scopes one join invocation to a single
/// cooperative thread, and `JoinQuery` itself holds `Rc`-based handles
/// (the from-side core reference, the abort flag) that are never shared
/// across threads.
pub trait Query {
    fn as_any(&self) -> &dyn Any;

    fn weight(&self, searcher: &Searcher) -> Result<Box<dyn Weight>>;
}

/// A query bound to one searcher; produces a `Scorer` per segment.
pub trait Weight {
    fn as_any(&self) -> &dyn Any;

    fn scorer<'a>(&'a self, reader: &'a SegmentReader) -> Result<Box<dyn Scorer + 'a>>;
}

/// A positioned `DocSet` that additionally knows how to score the document
/// it's on. The join filter never calls `score()` — its result is
/// constant-score (spec §6.2) — but it still produces a `Scorer` so it can
/// compose with the rest of the query engine the same way any other query
/// does.
pub trait Scorer: DocSet {
    fn score(&self) -> Score;
}
