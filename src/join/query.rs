//! Wires the term-walking executor into the `Query`/`Weight`/`Scorer`
//! family as a constant-score filter (spec §6.2): `JoinQuery::weight` runs
//! the whole join eagerly against the to-side searcher (the same
//! constant-score-at-construction-time pattern `AllQuery` follows trivially
//! by having no work to do), then hands out a `JoinScorer` per segment that
//! iterates the slice of the materialized result falling in that segment's
//! composite range.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use core::{CoreCatalog, ScopedFromCore, SegmentReader, Searcher};
use docset::JoinSet;
use error::{Error, ErrorKind, Result};
use join::driver::run_join;
use join::thresholds::JoinThresholds;
use join::{JoinConfig, JoinCounters};
use postings::DocSet;
use query::{Query, Scorer, Weight};
use std::any::Any;
use termdict::{CompositeTermCursor, TermCursor};
use DocId;
use Score;

/// The join filter itself: configuration plus the subquery defining the
/// from-side set (spec §6.1). Stateless and reusable across searchers, the
/// same way every other `Query` impl in the pack is.
pub struct JoinQuery {
    config: JoinConfig,
    from_query: Box<dyn Query>,
    /// Resolves `config.from_index` to a searcher for a cross-shard join.
    /// Absent for the common same-core case, where `config.from_index` is
    /// `None` and this is never consulted.
    catalog: Option<Rc<dyn CoreCatalog>>,
    /// Polled at the start of each to-side term iteration (spec §5's
    /// cancellation-observation point). Absent means the join always runs
    /// to completion, same as `catalog` being absent means same-core.
    abort: Option<Rc<AtomicBool>>,
}

impl JoinQuery {
    pub fn new(config: JoinConfig, from_query: Box<dyn Query>) -> JoinQuery {
        JoinQuery {
            config,
            from_query,
            catalog: None,
            abort: None,
        }
    }

    /// A cross-shard join additionally needs a way to resolve
    /// `config.from_index` to a searcher; attach it here rather than
    /// threading it through `Query::weight`'s signature, which every other
    /// query in the pack also implements and shouldn't have to care about
    /// cores at all.
    pub fn with_catalog(mut self, catalog: Rc<dyn CoreCatalog>) -> JoinQuery {
        self.catalog = Some(catalog);
        self
    }

    /// Lets a caller cancel a running join by setting the flag beforehand;
    /// checked cooperatively at the start of each to-side term iteration,
    /// not preemptively (spec §5: no yield points beyond cursor I/O are
    /// required).
    pub fn with_abort_flag(mut self, abort: Rc<AtomicBool>) -> JoinQuery {
        self.abort = Some(abort);
        self
    }
}

impl Query for JoinQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn weight(&self, to_searcher: &Searcher) -> Result<Box<dyn Weight>> {
        let from_core = match &self.config.from_index {
            Some(core_name) => {
                let catalog = self.catalog.as_deref().ok_or_else(|| {
                    Error::from(ErrorKind::BadRequest(format!(
                        "join targets fromIndex {:?} but no core catalog was attached",
                        core_name
                    )))
                })?;
                ScopedFromCore::open(catalog, core_name)?
            }
            None => ScopedFromCore::same_core(),
        };
        let from_searcher = from_core.from_searcher(to_searcher);
        build_weight(
            &self.config,
            self.from_query.as_ref(),
            from_searcher,
            to_searcher,
            self.abort.as_deref(),
        )
        // `from_core` drops here, releasing the from-side core reference
        // (spec §5: acquired once, released on every exit path) — the join
        // has already been run to completion by `build_weight` by this
        // point, so nothing downstream still needs it.
    }
}

fn build_weight(
    config: &JoinConfig,
    from_query: &dyn Query,
    from_searcher: &Searcher,
    to_searcher: &Searcher,
    abort: Option<&AtomicBool>,
) -> Result<Box<dyn Weight>> {
    let thresholds = JoinThresholds::for_max_docs(from_searcher.max_doc(), to_searcher.max_doc());
    let should_abort = || abort.map(|flag| flag.load(Ordering::Relaxed)).unwrap_or(false);
    let (result, counters) = run_join_over(
        config,
        from_query,
        from_searcher,
        to_searcher,
        &thresholds,
        should_abort,
    )?;

    debug!(target: "join", "{:?}", counters);

    let per_segment = bucket_by_segment(&result, to_searcher);
    Ok(Box::new(JoinWeight { per_segment, counters }))
}

/// Evaluates `Q`, walks both term dictionaries under `thresholds`, and
/// returns the finished to-side result together with the full diagnostic
/// counters. Factored out of `build_weight` so the threshold-invariance
/// and cross-path-equivalence property tests (spec §8) can drive the same
/// join logic `JoinQuery` uses while varying thresholds independently of
/// `from_searcher`/`to_searcher`'s `max_doc` — something
/// `JoinThresholds::for_max_docs` alone could never do.
fn run_join_over(
    config: &JoinConfig,
    from_query: &dyn Query,
    from_searcher: &Searcher,
    to_searcher: &Searcher,
    thresholds: &JoinThresholds,
    should_abort: impl Fn() -> bool,
) -> Result<(JoinSet, JoinCounters)> {
    let from_set = from_searcher.doc_set_for_query(from_query)?;

    let mut counters = JoinCounters::default();
    counters.from_set_size = from_set.size();

    let from_cursor_segments: Vec<(DocId, Box<dyn TermCursor + '_>)> = from_searcher
        .segments()
        .filter_map(|(base, seg)| seg.terms(config.from_field).map(|dict| (base, dict.cursor())))
        .collect();
    let to_cursor_segments: Vec<(DocId, Box<dyn TermCursor + '_>)> = to_searcher
        .segments()
        .filter_map(|(base, seg)| seg.terms(config.to_field).map(|dict| (base, dict.cursor())))
        .collect();

    let mut from_cursor = CompositeTermCursor::new(from_cursor_segments);
    let mut to_cursor = CompositeTermCursor::new(to_cursor_segments);

    let to_max_doc = to_searcher.max_doc() as usize;
    let to_field = config.to_field;
    let from_field = config.from_field;

    let (result, driver_counters) = run_join(
        &mut from_cursor,
        &mut to_cursor,
        &from_set,
        thresholds,
        to_max_doc,
        None,
        |term| from_searcher.doc_set_for_term(from_field, term),
        |term| to_searcher.doc_set_for_term(to_field, term),
        |doc| to_searcher.is_live(doc),
        should_abort,
    )?;
    counters.from_term_count = driver_counters.from_term_count;
    counters.from_term_total_df = driver_counters.from_term_total_df;
    counters.from_term_direct_count = driver_counters.from_term_direct_count;
    counters.from_term_hits = driver_counters.from_term_hits;
    counters.from_term_hits_total_df = driver_counters.from_term_hits_total_df;
    counters.to_term_hits = driver_counters.to_term_hits;
    counters.to_term_hits_total_df = driver_counters.to_term_hits_total_df;
    counters.to_term_direct_count = driver_counters.to_term_direct_count;
    counters.small_sets_deferred = driver_counters.small_sets_deferred;
    counters.to_set_docs_added = driver_counters.to_set_docs_added;
    counters.to_set_size = result.size();
    Ok((result, counters))
}

/// Splits the composite `result` back into per-segment local doc ids, keyed
/// by the pointer identity of each `SegmentReader` — `Weight::scorer` only
/// receives a `&SegmentReader`, not the base offset it was registered
/// under, so this is the lookup `JoinWeight::scorer` consults.
fn bucket_by_segment(result: &JoinSet, to_searcher: &Searcher) -> HashMap<usize, Vec<DocId>> {
    let segs: Vec<(DocId, usize, DocId)> = to_searcher
        .segments()
        .map(|(base, seg)| (base, seg as *const SegmentReader as usize, seg.max_doc()))
        .collect();
    let bases: Vec<DocId> = segs.iter().map(|&(base, _, _)| base).collect();

    let mut per_segment: HashMap<usize, Vec<DocId>> = HashMap::new();
    for doc in result.iter() {
        let idx = match bases.binary_search(&doc) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        if let Some(&(base, ptr, max_doc)) = segs.get(idx) {
            if doc < base + max_doc {
                per_segment.entry(ptr).or_insert_with(Vec::new).push(doc - base);
            }
        }
    }
    per_segment
}

/// The bound, already-evaluated join filter (spec §6.2). Not cacheable: the
/// join result is materialized once at construction and handed out per
/// segment, never recomputed, but the `Weight` itself is not stored in any
/// upstream query cache (spec §6.2's "the filter is not cacheable").
pub struct JoinWeight {
    per_segment: HashMap<usize, Vec<DocId>>,
    counters: JoinCounters,
}

impl JoinWeight {
    pub fn counters(&self) -> &JoinCounters {
        &self.counters
    }
}

impl Weight for JoinWeight {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn scorer<'a>(&'a self, reader: &'a SegmentReader) -> Result<Box<dyn Scorer + 'a>> {
        let ptr = reader as *const SegmentReader as usize;
        let docs = self.per_segment.get(&ptr).cloned().unwrap_or_default();
        Ok(Box::new(JoinScorer {
            docs,
            pos: 0,
            doc: 0,
        }))
    }
}

/// Iterates one segment's slice of the materialized join result in
/// ascending local-doc-id order (spec §5's ordering guarantee, restated
/// per-segment). Constant score: the join filter itself carries no
/// relevance signal (spec §6.2).
pub struct JoinScorer {
    docs: Vec<DocId>,
    pos: usize,
    doc: DocId,
}

impl DocSet for JoinScorer {
    fn advance(&mut self) -> bool {
        if self.pos >= self.docs.len() {
            return false;
        }
        self.doc = self.docs[self.pos];
        self.pos += 1;
        true
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> usize {
        self.docs.len().saturating_sub(self.pos)
    }
}

impl Scorer for JoinScorer {
    fn score(&self) -> Score {
        1.0
    }
}
