use postings::CompositePostings;
use postings::DocSet;
use termdict::{SeekStatus, TermCursor};
use DocId;

struct Sub<'a> {
    base: DocId,
    cursor: Box<dyn TermCursor + 'a>,
    /// Whether this sub-cursor has ever been given a chance to position
    /// itself (by `seek_ceil` or `next`). Mirrors `CompositePostings`'s
    /// `started` flag: without it, a freshly built cursor's very first
    /// `next()` call would have nothing to compare `positioned` subs
    /// against and would advance none of them.
    started: bool,
    positioned: bool,
}

/// Merges the per-segment term cursors of a multi-segment reader into one
/// sorted enumeration, the way the rest of the executor expects a single
/// field's term dictionary to look (spec §4.1, §9: "pick one
/// representation and hide the distinction"). Segments that don't have the
/// current term are transparently skipped; a term present in several
/// segments is surfaced once, with `doc_freq` summed and `postings` a
/// composite stream rebased by each segment's `base`.
pub struct CompositeTermCursor<'a> {
    subs: Vec<Sub<'a>>,
    current_term: Option<Vec<u8>>,
}

impl<'a> CompositeTermCursor<'a> {
    pub fn new(segments: Vec<(DocId, Box<dyn TermCursor + 'a>)>) -> CompositeTermCursor<'a> {
        let subs = segments
            .into_iter()
            .map(|(base, cursor)| Sub {
                base,
                cursor,
                started: false,
                positioned: false,
            })
            .collect();
        CompositeTermCursor {
            subs,
            current_term: None,
        }
    }

    fn recompute_current(&self) -> Option<Vec<u8>> {
        self.subs
            .iter()
            .filter(|s| s.positioned)
            .filter_map(|s| s.cursor.term())
            .min()
            .map(|t| t.to_vec())
    }

    fn subs_on_current(&self) -> impl Iterator<Item = &Sub<'a>> {
        let current = self.current_term.clone();
        self.subs.iter().filter(move |s| {
            s.positioned && s.cursor.term().map(|t| Some(t.to_vec()) == current).unwrap_or(false)
        })
    }
}

impl<'a> TermCursor for CompositeTermCursor<'a> {
    fn seek_ceil(&mut self, term: &[u8]) -> SeekStatus {
        for sub in &mut self.subs {
            sub.started = true;
            sub.positioned = sub.cursor.seek_ceil(term) != SeekStatus::End;
        }
        self.current_term = self.recompute_current();
        match &self.current_term {
            Some(t) if t.as_slice() == term => SeekStatus::Found,
            Some(_) => SeekStatus::NotFound,
            None => SeekStatus::End,
        }
    }

    fn next(&mut self) -> Option<()> {
        let current = self.current_term.clone();
        for sub in &mut self.subs {
            if !sub.started {
                sub.started = true;
                sub.positioned = sub.cursor.next().is_some();
            } else if sub.positioned && sub.cursor.term().map(|t| t.to_vec()) == current {
                sub.positioned = sub.cursor.next().is_some();
            }
        }
        self.current_term = self.recompute_current();
        self.current_term.as_ref().map(|_| ())
    }

    fn term(&self) -> Option<&[u8]> {
        self.current_term.as_deref()
    }

    fn doc_freq(&self) -> u32 {
        self.subs_on_current().map(|s| s.cursor.doc_freq()).sum()
    }

    fn postings(&self) -> Box<dyn DocSet> {
        let streams: Vec<(DocId, Box<dyn DocSet>)> = self
            .subs_on_current()
            .map(|s| (s.base, s.cursor.postings()))
            .collect();
        Box::new(CompositePostings::new(streams))
    }
}
