use postings::{DocSet, VecPostings};
use termdict::{SeekStatus, TermCursor, TermDictionary};
use DocId;

struct TermEntry {
    term: Vec<u8>,
    docs: Vec<DocId>,
}

/// A term dictionary backed by a plain sorted `Vec`. This is the
/// dictionary `join::testkit` builds for its fake readers, and doubles as
/// a reference implementation to check `FstTermDictionary` against.
pub struct VecTermDictionary {
    entries: Vec<TermEntry>,
}

impl VecTermDictionary {
    /// `terms` must already be sorted by term bytes and each doc list must
    /// already be sorted ascending; this constructor does not re-sort, to
    /// keep construction cost linear for callers that already maintain
    /// sorted postings.
    pub fn from_sorted_terms(terms: Vec<(Vec<u8>, Vec<DocId>)>) -> VecTermDictionary {
        debug_assert!(terms.windows(2).all(|w| w[0].0 < w[1].0));
        let entries = terms
            .into_iter()
            .map(|(term, docs)| TermEntry { term, docs })
            .collect();
        VecTermDictionary { entries }
    }
}

impl TermDictionary for VecTermDictionary {
    fn cursor(&self) -> Box<dyn TermCursor + '_> {
        Box::new(VecTermCursor {
            dict: self,
            pos: None,
        })
    }
}

struct VecTermCursor<'a> {
    dict: &'a VecTermDictionary,
    // `None` before the first seek/next; `Some(i)` once positioned, where
    // `i == dict.entries.len()` denotes exhaustion.
    pos: Option<usize>,
}

impl<'a> VecTermCursor<'a> {
    fn current(&self) -> Option<&'a TermEntry> {
        match self.pos {
            Some(i) if i < self.dict.entries.len() => Some(&self.dict.entries[i]),
            _ => None,
        }
    }
}

impl<'a> TermCursor for VecTermCursor<'a> {
    fn seek_ceil(&mut self, term: &[u8]) -> SeekStatus {
        match self
            .dict
            .entries
            .binary_search_by(|entry| entry.term.as_slice().cmp(term))
        {
            Ok(i) => {
                self.pos = Some(i);
                SeekStatus::Found
            }
            Err(i) if i < self.dict.entries.len() => {
                self.pos = Some(i);
                SeekStatus::NotFound
            }
            Err(_) => {
                self.pos = Some(self.dict.entries.len());
                SeekStatus::End
            }
        }
    }

    fn next(&mut self) -> Option<()> {
        let next_pos = match self.pos {
            None => 0,
            Some(i) => i + 1,
        };
        self.pos = Some(next_pos);
        if next_pos < self.dict.entries.len() {
            Some(())
        } else {
            None
        }
    }

    fn term(&self) -> Option<&[u8]> {
        self.current().map(|e| e.term.as_slice())
    }

    fn doc_freq(&self) -> u32 {
        self.current().map(|e| e.docs.len() as u32).unwrap_or(0)
    }

    fn postings(&self) -> Box<dyn DocSet> {
        let docs = self.current().map(|e| e.docs.clone()).unwrap_or_default();
        Box::new(VecPostings::from(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::VecTermDictionary;
    use postings::DocSet;
    use termdict::{SeekStatus, TermCursor, TermDictionary};

    fn build() -> VecTermDictionary {
        VecTermDictionary::from_sorted_terms(vec![
            (b"a".to_vec(), vec![0, 2]),
            (b"b".to_vec(), vec![1]),
            (b"c".to_vec(), vec![3, 4]),
        ])
    }

    #[test]
    fn test_seek_found() {
        let dict = build();
        let mut cursor = dict.cursor();
        assert_eq!(cursor.seek_ceil(b"b"), SeekStatus::Found);
        assert_eq!(cursor.term(), Some(&b"b"[..]));
        assert_eq!(cursor.doc_freq(), 1);
    }

    #[test]
    fn test_seek_not_found_lands_on_next() {
        let dict = build();
        let mut cursor = dict.cursor();
        assert_eq!(cursor.seek_ceil(b"ab"), SeekStatus::NotFound);
        assert_eq!(cursor.term(), Some(&b"b"[..]));
    }

    #[test]
    fn test_seek_past_end() {
        let dict = build();
        let mut cursor = dict.cursor();
        assert_eq!(cursor.seek_ceil(b"z"), SeekStatus::End);
        assert_eq!(cursor.term(), None);
    }

    #[test]
    fn test_next_enumerates_all_terms() {
        let dict = build();
        let mut cursor = dict.cursor();
        let mut terms = vec![];
        while cursor.next().is_some() {
            terms.push(cursor.term().unwrap().to_vec());
        }
        assert_eq!(terms, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_postings_of_current_term() {
        let dict = build();
        let mut cursor = dict.cursor();
        cursor.seek_ceil(b"c");
        let mut postings = cursor.postings();
        assert!(postings.advance());
        assert_eq!(postings.doc(), 3);
        assert!(postings.advance());
        assert_eq!(postings.doc(), 4);
        assert!(!postings.advance());
    }
}
