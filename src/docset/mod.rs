//! The Doc-Set Abstraction (spec §4.2): an opaque set of document ids on
//! one side of the join. Not to be confused with `postings::DocSet`, which
//! is a forward-only *iterator* contract — a `JoinSet` is a materialized
//! set with random access, exposed to both the From-Side Classifier (as
//! the membership view backing `fromSet`) and the To-Side Accumulator (as
//! the thing being unioned together).

use fixedbitset::FixedBitSet;
use DocId;

/// A random-access membership predicate over a bounded doc id range.
/// `JoinSet::membership_view` returns one of these; it may decline to
/// build one (e.g. for a single-element sparse set it would be wasteful).
pub trait Bits {
    fn get(&self, doc: DocId) -> bool;
}

impl Bits for FixedBitSet {
    fn get(&self, doc: DocId) -> bool {
        self.contains(doc as usize)
    }
}

/// A set of doc ids backed by a dense bitset of length `max_doc`.
#[derive(Clone)]
pub struct DenseBitDocSet {
    bits: FixedBitSet,
    len: usize,
}

impl DenseBitDocSet {
    pub fn new(max_doc: usize) -> DenseBitDocSet {
        DenseBitDocSet {
            bits: FixedBitSet::with_capacity(max_doc),
            len: 0,
        }
    }

    pub fn from_bitset(bits: FixedBitSet) -> DenseBitDocSet {
        let len = bits.count_ones(..);
        DenseBitDocSet { bits, len }
    }

    pub fn insert(&mut self, doc: DocId) {
        if !self.bits.put(doc as usize) {
            self.len += 1;
        }
    }

    pub fn union_from(&mut self, other: &DenseBitDocSet) {
        self.bits.union_with(&other.bits);
        self.len = self.bits.count_ones(..);
    }

    pub fn bits(&self) -> &FixedBitSet {
        &self.bits
    }

    pub fn into_bitset(self) -> FixedBitSet {
        self.bits
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn intersects(&self, other: &DenseBitDocSet) -> bool {
        self.bits.ones().any(|doc| other.bits.contains(doc))
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.bits.contains(doc as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bits.ones().map(|d| d as DocId)
    }
}

/// A set of doc ids backed by an ascending, deduplicated array. Cheaper
/// than a dense bitset for small sets, and the natural representation for
/// a cached per-term posting list that is never promoted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortedIntDocSet {
    docs: Vec<DocId>,
}

impl SortedIntDocSet {
    pub fn from_sorted(docs: Vec<DocId>) -> SortedIntDocSet {
        debug_assert!(docs.windows(2).all(|w| w[0] < w[1]));
        SortedIntDocSet { docs }
    }

    pub fn size(&self) -> usize {
        self.docs.len()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.docs
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.docs.binary_search(&doc).is_ok()
    }

    pub fn intersects(&self, other: &SortedIntDocSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.docs.len() && j < other.docs.len() {
            match self.docs[i].cmp(&other.docs[j]) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        false
    }

    pub fn add_all_to(&self, bits: &mut FixedBitSet) {
        for &doc in &self.docs {
            bits.insert(doc as usize);
        }
    }
}

/// The union of the two concrete variants the executor ever produces or
/// consumes, plus an explicit empty case. The executor only ever inspects
/// the variant to fast-path cloning a bitset-backed cached set directly
/// into the accumulator (spec §4.5 rule 2); every other use goes through
/// `size`/`intersects`/`membership_view`.
#[derive(Clone)]
pub enum JoinSet {
    Empty,
    Dense(DenseBitDocSet),
    Sorted(SortedIntDocSet),
}

impl JoinSet {
    pub fn size(&self) -> usize {
        match self {
            JoinSet::Empty => 0,
            JoinSet::Dense(d) => d.size(),
            JoinSet::Sorted(s) => s.size(),
        }
    }

    pub fn intersects(&self, other: &JoinSet) -> bool {
        match (self, other) {
            (JoinSet::Empty, _) | (_, JoinSet::Empty) => false,
            (JoinSet::Dense(a), JoinSet::Dense(b)) => a.intersects(b),
            (JoinSet::Sorted(a), JoinSet::Sorted(b)) => a.intersects(b),
            (JoinSet::Dense(d), JoinSet::Sorted(s)) | (JoinSet::Sorted(s), JoinSet::Dense(d)) => {
                s.as_slice().iter().any(|&doc| d.contains(doc))
            }
        }
    }

    /// Random-access membership test over the set, used by the From-Side
    /// Classifier's direct-scan route (spec §4.4). Returns `None` only for
    /// the empty set, where every doc trivially fails membership.
    pub fn membership_view(&self) -> Option<MembershipView> {
        match self {
            JoinSet::Empty => None,
            JoinSet::Dense(d) => Some(MembershipView::Dense(d)),
            JoinSet::Sorted(s) => Some(MembershipView::Sorted(s)),
        }
    }

    pub fn add_all_to(&self, bits: &mut FixedBitSet) {
        match self {
            JoinSet::Empty => {}
            JoinSet::Dense(d) => bits.union_with(d.bits()),
            JoinSet::Sorted(s) => s.add_all_to(bits),
        }
    }

    /// Ascending iteration over every doc id in the set, used to slice a
    /// whole-searcher result down to one segment's local id range (see
    /// `join::query::JoinWeight`).
    pub fn iter(&self) -> Box<dyn Iterator<Item = DocId> + '_> {
        match self {
            JoinSet::Empty => Box::new(std::iter::empty()),
            JoinSet::Dense(d) => Box::new(d.iter()),
            JoinSet::Sorted(s) => Box::new(s.as_slice().iter().copied()),
        }
    }
}

pub enum MembershipView<'a> {
    Dense(&'a DenseBitDocSet),
    Sorted(&'a SortedIntDocSet),
}

impl<'a> Bits for MembershipView<'a> {
    fn get(&self, doc: DocId) -> bool {
        match self {
            MembershipView::Dense(d) => d.contains(doc),
            MembershipView::Sorted(s) => s.contains(doc),
        }
    }
}
