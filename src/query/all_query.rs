use core::{SegmentReader, Searcher};
use error::Result;
use postings::DocSet;
use query::{Query, Scorer, Weight};
use std::any::Any;
use DocId;
use Score;

/// Matches every live document. Used directly as the from-side subquery in
/// spec §8's scenarios ("Q=match_all"), and as a minimal, always-available
/// `Query` implementation for tests.
#[derive(Debug)]
pub struct AllQuery;

impl Query for AllQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn weight(&self, _searcher: &Searcher) -> Result<Box<dyn Weight>> {
        Ok(Box::new(AllWeight))
    }
}

pub struct AllWeight;

impl Weight for AllWeight {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn scorer<'a>(&'a self, reader: &'a SegmentReader) -> Result<Box<dyn Scorer + 'a>> {
        Ok(Box::new(AllScorer {
            started: false,
            doc: 0,
            max_doc: reader.max_doc(),
            reader,
        }))
    }
}

pub struct AllScorer<'a> {
    started: bool,
    doc: DocId,
    max_doc: DocId,
    reader: &'a SegmentReader,
}

impl<'a> DocSet for AllScorer<'a> {
    fn advance(&mut self) -> bool {
        loop {
            if self.started {
                self.doc += 1;
            } else {
                self.started = true;
            }
            if self.doc >= self.max_doc {
                return false;
            }
            if self.reader.is_live(self.doc) {
                return true;
            }
        }
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> usize {
        self.max_doc as usize
    }
}

impl<'a> Scorer for AllScorer<'a> {
    fn score(&self) -> Score {
        1.0
    }
}
