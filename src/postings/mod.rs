//! DocId streams over postings.
//!
//! `DocSet` is the iteration contract shared by every postings cursor in
//! this crate: forward-only, ascending, with an optional `skip_next` for
//! cursors that can seek cheaper than repeated `advance`. It underlies the
//! Postings Adapter of spec §4.1.

mod composite;
mod vec_postings;

pub use self::composite::CompositePostings;
pub use self::vec_postings::VecPostings;

use DocId;

/// Outcome of `DocSet::skip_next`.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum SkipResult {
    /// The target doc id itself was found.
    Reached,
    /// The target was not present; the cursor is now on the first doc id
    /// past it.
    OverStep,
    /// The cursor is exhausted; there is no doc id at or past the target.
    End,
}

/// A positioned, forward-only stream of ascending `DocId`s.
pub trait DocSet {
    /// Advances to the next doc id. Returns `false` once exhausted, at
    /// which point `doc()` is undefined (by convention, callers should
    /// treat it as `NO_MORE_DOCS`).
    fn advance(&mut self) -> bool;

    /// The doc id the cursor is currently positioned on. Only meaningful
    /// after a call to `advance` that returned `true`.
    fn doc(&self) -> DocId;

    /// A cheap, possibly loose upper bound on the number of remaining docs.
    /// Used only for cost estimation (e.g. allocation sizing), never for
    /// correctness.
    fn size_hint(&self) -> usize;

    /// Moves forward to the first doc id `>= target`. The default
    /// implementation repeatedly calls `advance`; cursors backed by a
    /// random-access structure (e.g. a sorted array) should override this
    /// with a binary search.
    fn skip_next(&mut self, target: DocId) -> SkipResult {
        loop {
            if !self.advance() {
                return SkipResult::End;
            }
            if self.doc() == target {
                return SkipResult::Reached;
            }
            if self.doc() > target {
                return SkipResult::OverStep;
            }
        }
    }
}

impl DocSet for Box<dyn DocSet> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn doc(&self) -> DocId {
        (**self).doc()
    }

    fn size_hint(&self) -> usize {
        (**self).size_hint()
    }

    fn skip_next(&mut self, target: DocId) -> SkipResult {
        (**self).skip_next(target)
    }
}
