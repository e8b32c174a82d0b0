//! Reader/searcher types: the consumed interfaces of spec §6.3, made
//! concrete enough to compile against. Searcher lifecycle, reference
//! counting and cross-shard core lookup stay pluggable (`CoreCatalog`)
//! rather than baked in, per spec §1's "out of scope" list; the doc-set
//! cache is likewise a trait (`DocSetCache`) so a real deployment can swap
//! in its own LRU without touching the executor.

mod searcher;

pub use self::searcher::{evaluate_query, DocSetCache, Searcher};

use std::collections::HashMap;
use std::rc::Rc;

use docset::Bits;
use schema::Field;
use termdict::TermDictionary;
use error::Result;
use DocId;

/// Marks undeleted documents. Absent ⇒ all docs in the segment are live
/// (spec §3).
pub struct LiveDocs {
    bits: Box<dyn Bits>,
}

impl LiveDocs {
    pub fn new(bits: Box<dyn Bits>) -> LiveDocs {
        LiveDocs { bits }
    }

    pub fn is_live(&self, doc: DocId) -> bool {
        self.bits.get(doc)
    }
}

/// One segment: a bounded `DocId` range `[0, max_doc)`, an optional
/// liveness predicate, and the field → term-dictionary map a join walks.
pub struct SegmentReader {
    max_doc: DocId,
    live_docs: Option<LiveDocs>,
    fields: HashMap<Field, Box<dyn TermDictionary>>,
}

impl SegmentReader {
    pub fn new(
        max_doc: DocId,
        live_docs: Option<LiveDocs>,
        fields: HashMap<Field, Box<dyn TermDictionary>>,
    ) -> SegmentReader {
        SegmentReader {
            max_doc,
            live_docs,
            fields,
        }
    }

    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    pub fn live_docs(&self) -> Option<&LiveDocs> {
        self.live_docs.as_ref()
    }

    pub fn is_live(&self, doc: DocId) -> bool {
        self.live_docs.as_ref().map(|l| l.is_live(doc)).unwrap_or(true)
    }

    pub fn terms(&self, field: Field) -> Option<&dyn TermDictionary> {
        self.fields.get(&field).map(|b| b.as_ref())
    }
}

/// Opens a `Searcher` for a named shard/core. This is the external
/// collaborator spec §9 tells us to thread through explicitly instead of
/// reaching for thread-local request state: implementations typically hold
/// a registry of cores keyed by name and ref-count the returned searcher.
pub trait CoreCatalog {
    fn open(&self, core_name: &str) -> Result<Rc<Searcher>>;
}

/// The scoped resource spec §9 asks for in place of a thread-local request
/// context: owns the from-side core's searcher handle (if the join is
/// cross-shard) for the duration of one join invocation, and releases it
/// on every exit path via `Drop` — normal return, early return on error,
/// or panic unwinding.
pub struct ScopedFromCore {
    remote: Option<Rc<Searcher>>,
}

impl ScopedFromCore {
    /// The common case: `from` and `to` share a core, so there is nothing
    /// extra to open or release.
    pub fn same_core() -> ScopedFromCore {
        ScopedFromCore { remote: None }
    }

    /// Opens the named from-side core exactly once.
    pub fn open(catalog: &dyn CoreCatalog, core_name: &str) -> Result<ScopedFromCore> {
        let remote = catalog.open(core_name)?;
        Ok(ScopedFromCore {
            remote: Some(remote),
        })
    }

    /// The searcher to run the from-side subquery against: the opened
    /// remote core if this is a cross-shard join, otherwise `to_searcher`.
    pub fn from_searcher<'a>(&'a self, to_searcher: &'a Searcher) -> &'a Searcher {
        self.remote.as_deref().unwrap_or(to_searcher)
    }
}

impl Drop for ScopedFromCore {
    fn drop(&mut self) {
        // Dropping `self.remote` releases our one `Rc` reference. Closing
        // the same `ScopedFromCore` twice can't happen (ownership), so the
        // release is idempotent by construction — the guarantee spec §5
        // asks for.
    }
}
