//! In-memory fixtures used only by `#[cfg(test)]` code: a single-segment
//! `Searcher` built directly from per-doc term values, and a `DocSetCache`
//! that never actually caches — it just evaluates every request on the
//! spot against the fixture's term dictionaries. Stands in for the real
//! index-writer pipeline and LRU cache spec §1 places out of scope.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use core::{evaluate_query, CoreCatalog, DocSetCache, LiveDocs, SegmentReader, Searcher};
use docset::{JoinSet, SortedIntDocSet};
use error::Result;
use fixedbitset::FixedBitSet;
use postings::DocSet;
use query::Query;
use schema::Field;
use termdict::{SeekStatus, TermCursor, TermDictionary, VecTermDictionary};
use DocId;

/// Builds a one-segment `Searcher` where doc `i`'s value in `from_field` is
/// `docs[i].0` and in `to_field` is `docs[i].1`; `deleted` marks local doc
/// ids excluded from `LiveDocs`.
pub fn fake_searcher(
    from_field: Field,
    to_field: Field,
    docs: Vec<(Vec<Vec<u8>>, Vec<Vec<u8>>)>,
    deleted: &[DocId],
    cache: Rc<dyn DocSetCache>,
) -> Searcher {
    let max_doc = docs.len() as DocId;
    let from_terms = postings_by_term(docs.iter().map(|(from, _)| from.clone()));
    let to_terms = postings_by_term(docs.iter().map(|(_, to)| to.clone()));

    let mut fields: HashMap<Field, Box<dyn TermDictionary>> = HashMap::new();
    fields.insert(from_field, Box::new(VecTermDictionary::from_sorted_terms(from_terms)));
    // A self-join (from_field == to_field) only needs one entry.
    fields.entry(to_field).or_insert_with(|| Box::new(VecTermDictionary::from_sorted_terms(to_terms)));

    let live_docs = if deleted.is_empty() {
        None
    } else {
        let mut bits = FixedBitSet::with_capacity(max_doc as usize);
        bits.set_range(.., true);
        for &d in deleted {
            bits.set(d as usize, false);
        }
        Some(LiveDocs::new(Box::new(bits)))
    };

    let segment = SegmentReader::new(max_doc, live_docs, fields);
    Searcher::new(vec![segment], cache)
}

fn postings_by_term(per_doc_terms: impl Iterator<Item = Vec<Vec<u8>>>) -> Vec<(Vec<u8>, Vec<DocId>)> {
    let mut by_term: BTreeMap<Vec<u8>, Vec<DocId>> = BTreeMap::new();
    for (doc, terms) in per_doc_terms.enumerate() {
        for term in terms {
            by_term.entry(term).or_default().push(doc as DocId);
        }
    }
    by_term.into_iter().collect()
}

/// A `DocSetCache` that performs no caching: every request is answered by
/// scanning the fixture's term dictionaries directly. Sufficient for tests
/// that need a working `DocSetCache` without standing up a real LRU.
pub struct FakeDocSetCache;

impl DocSetCache for FakeDocSetCache {
    fn doc_set_for_query(&self, query: &dyn Query, searcher: &Searcher) -> Result<JoinSet> {
        evaluate_query(query, searcher)
    }

    fn doc_set_for_term(&self, searcher: &Searcher, field: Field, term: &[u8]) -> Result<JoinSet> {
        let mut docs = Vec::new();
        for (base, segment) in searcher.segments() {
            let dict = match segment.terms(field) {
                Some(dict) => dict,
                None => continue,
            };
            let mut cursor = dict.cursor();
            if cursor.seek_ceil(term) != SeekStatus::Found {
                continue;
            }
            let mut postings = cursor.postings();
            while postings.advance() {
                let doc = base + postings.doc();
                if segment.is_live(doc - base) {
                    docs.push(doc);
                }
            }
        }
        if docs.is_empty() {
            Ok(JoinSet::Empty)
        } else {
            Ok(JoinSet::Sorted(SortedIntDocSet::from_sorted(docs)))
        }
    }
}

/// A `CoreCatalog` resolving named cores to pre-registered fixture
/// searchers, for exercising cross-shard joins (spec §8 scenario 5)
/// without a real multi-core deployment.
#[derive(Default)]
pub struct FakeCatalog {
    cores: RefCell<HashMap<String, Rc<Searcher>>>,
}

impl FakeCatalog {
    pub fn new() -> FakeCatalog {
        FakeCatalog::default()
    }

    pub fn register(&self, core_name: &str, searcher: Searcher) {
        self.cores.borrow_mut().insert(core_name.to_string(), Rc::new(searcher));
    }
}

impl CoreCatalog for FakeCatalog {
    fn open(&self, core_name: &str) -> Result<Rc<Searcher>> {
        use error::{Error, ErrorKind};
        self.cores
            .borrow()
            .get(core_name)
            .cloned()
            .ok_or_else(|| Error::from(ErrorKind::BadRequest(format!("unknown core {:?}", core_name))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_searcher_builds_queryable_term_dicts() {
        let searcher = fake_searcher(
            Field::from_ord(0),
            Field::from_ord(1),
            vec![(vec![b"a".to_vec()], vec![]), (vec![], vec![b"a".to_vec()])],
            &[],
            Rc::new(FakeDocSetCache),
        );
        let result = FakeDocSetCache.doc_set_for_term(&searcher, Field::from_ord(1), b"a").unwrap();
        assert_eq!(result.size(), 1);
        assert!(result.iter().any(|d| d == 1));
    }

    #[test]
    fn test_fake_searcher_respects_deletions() {
        let searcher = fake_searcher(
            Field::from_ord(0),
            Field::from_ord(1),
            vec![(vec![], vec![b"a".to_vec()]), (vec![], vec![b"a".to_vec()])],
            &[0],
            Rc::new(FakeDocSetCache),
        );
        let result = FakeDocSetCache.doc_set_for_term(&searcher, Field::from_ord(1), b"a").unwrap();
        let mut docs: Vec<_> = result.iter().collect();
        docs.sort_unstable();
        assert_eq!(docs, vec![1]);
    }
}
