use std::rc::Rc;

use core::SegmentReader;
use docset::{DenseBitDocSet, JoinSet, SortedIntDocSet};
use error::Result;
use query::Query;
use schema::Field;
use DocId;

/// Bitset-density crossover above which `evaluate_query` materializes a
/// dense result rather than a sorted array. Purely a performance choice —
/// both representations answer `size`/`intersects`/`membership_view`
/// identically.
const DENSE_CROSSOVER_NUM: usize = 1;
const DENSE_CROSSOVER_DEN: usize = 8;

/// The from-/to-side doc-set cache spec §6.3 calls out as an external
/// collaborator. A real deployment backs this with an LRU keyed on query
/// identity or `(field, term)`; the join executor itself never writes to
/// it (spec §5).
pub trait DocSetCache {
    fn doc_set_for_query(&self, query: &dyn Query, searcher: &Searcher) -> Result<JoinSet>;

    fn doc_set_for_term(&self, searcher: &Searcher, field: Field, term: &[u8]) -> Result<JoinSet>;
}

/// One or more segments presented as a single composite `DocId` space,
/// plus the doc-set cache the executor consults. Acquired for the
/// duration of one join invocation (spec §3 lifecycle); the caller owns
/// and borrows it in.
pub struct Searcher {
    segments: Vec<SegmentReader>,
    bases: Vec<DocId>,
    cache: Rc<dyn DocSetCache>,
}

impl Searcher {
    pub fn new(segments: Vec<SegmentReader>, cache: Rc<dyn DocSetCache>) -> Searcher {
        let mut bases = Vec::with_capacity(segments.len());
        let mut base = 0;
        for segment in &segments {
            bases.push(base);
            base += segment.max_doc();
        }
        Searcher {
            segments,
            bases,
            cache,
        }
    }

    pub fn max_doc(&self) -> DocId {
        match (self.bases.last(), self.segments.last()) {
            (Some(&base), Some(seg)) => base + seg.max_doc(),
            _ => 0,
        }
    }

    /// Segment readers paired with the composite-id base they were
    /// assigned at construction, in registration order.
    pub fn segments(&self) -> impl Iterator<Item = (DocId, &SegmentReader)> {
        self.bases.iter().copied().zip(self.segments.iter())
    }

    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.segments
    }

    pub fn doc_set_for_query(&self, query: &dyn Query) -> Result<JoinSet> {
        self.cache.doc_set_for_query(query, self)
    }

    pub fn doc_set_for_term(&self, field: Field, term: &[u8]) -> Result<JoinSet> {
        self.cache.doc_set_for_term(self, field, term)
    }

    /// Liveness of a composite doc id, resolved to its owning segment.
    pub fn is_live(&self, doc: DocId) -> bool {
        let idx = match self.bases.binary_search(&doc) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        match self.segments.get(idx) {
            Some(segment) => segment.is_live(doc - self.bases[idx]),
            None => true,
        }
    }
}

/// Runs `query` against every segment of `searcher` and materializes the
/// matching composite doc ids as a `JoinSet`. This is the raw evaluation
/// logic a `DocSetCache` impl calls on a cache miss; it is not itself a
/// cache (spec explicitly keeps cache implementations external).
pub fn evaluate_query(query: &dyn Query, searcher: &Searcher) -> Result<JoinSet> {
    let weight = query.weight(searcher)?;
    let mut docs = Vec::new();
    for (base, segment) in searcher.segments() {
        let mut scorer = weight.scorer(segment)?;
        while scorer.advance() {
            docs.push(base + scorer.doc());
        }
    }
    Ok(materialize(docs, searcher.max_doc()))
}

fn materialize(docs: Vec<DocId>, max_doc: DocId) -> JoinSet {
    if docs.is_empty() {
        return JoinSet::Empty;
    }
    if docs.len() * DENSE_CROSSOVER_DEN > max_doc as usize * DENSE_CROSSOVER_NUM {
        let mut dense = DenseBitDocSet::new(max_doc as usize);
        for doc in docs {
            dense.insert(doc);
        }
        JoinSet::Dense(dense)
    } else {
        JoinSet::Sorted(SortedIntDocSet::from_sorted(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate_query, Searcher};
    use join::testkit::FakeDocSetCache;
    use postings::DocSet;
    use query::AllQuery;
    use std::rc::Rc;

    #[test]
    fn test_evaluate_all_query_over_one_segment() {
        use core::SegmentReader;
        use std::collections::HashMap;
        let segment = SegmentReader::new(5, None, HashMap::new());
        let searcher = Searcher::new(vec![segment], Rc::new(FakeDocSetCache));
        let result = evaluate_query(&AllQuery, &searcher).unwrap();
        assert_eq!(result.size(), 5);
    }
}
