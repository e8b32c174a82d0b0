use postings::{DocSet, SkipResult};
use DocId;

/// A `DocSet` backed by a plain ascending `Vec<DocId>`. Used by tests and
/// by the in-memory `join::testkit` fixtures in place of a real on-disk
/// postings list.
pub struct VecPostings {
    docs: Vec<DocId>,
    cursor: usize,
}

impl From<Vec<DocId>> for VecPostings {
    fn from(docs: Vec<DocId>) -> VecPostings {
        debug_assert!(docs.windows(2).all(|w| w[0] < w[1]));
        VecPostings { docs, cursor: 0 }
    }
}

impl DocSet for VecPostings {
    fn advance(&mut self) -> bool {
        if self.cursor >= self.docs.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn doc(&self) -> DocId {
        self.docs[self.cursor - 1]
    }

    fn size_hint(&self) -> usize {
        self.docs.len().saturating_sub(self.cursor)
    }

    fn skip_next(&mut self, target: DocId) -> SkipResult {
        // binary search from the current position onward.
        let start = self.cursor;
        match self.docs[start..].binary_search(&target) {
            Ok(offset) => {
                self.cursor = start + offset + 1;
                SkipResult::Reached
            }
            Err(offset) => {
                if start + offset >= self.docs.len() {
                    self.cursor = self.docs.len();
                    SkipResult::End
                } else {
                    self.cursor = start + offset + 1;
                    SkipResult::OverStep
                }
            }
        }
    }
}
