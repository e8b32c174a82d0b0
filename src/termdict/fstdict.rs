use std::io;

use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use postings::{DocSet, VecPostings};
use termdict::{SeekStatus, TermCursor, TermDictionary};
use error::Result;
use DocId;

/// `fst::Error` carries no `foreign_links` entry of its own (spec §7
/// distinguishes `IndexIo` from the other error kinds, and an `fst`
/// build failure is exactly that); wrap it as `io::Error` the same way
/// the teacher's own `datastruct::fstmap::convert_fst_error` does, so it
/// flows through the crate's existing `Io` foreign link.
fn convert_fst_error(e: fst::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

/// A term dictionary backed by an `fst::Map` from term bytes to an
/// ordinal, with postings kept in a side table indexed by that ordinal.
/// This is the production-shaped dictionary: lexicographic enumeration and
/// `seek_ceil` are answered by the FST itself rather than a linear scan,
/// matching how the teacher's own `datastruct::fstmap` leans on `fst` for
/// exactly this kind of sorted-key lookup.
pub struct FstTermDictionary {
    map: Map<Vec<u8>>,
    postings: Vec<Vec<DocId>>,
}

impl FstTermDictionary {
    /// `terms` must be sorted and deduplicated by term bytes; this is the
    /// contract `fst::MapBuilder::insert` itself enforces. Unlike a panic
    /// on violation, the caller's mistake is surfaced as an ordinary
    /// `IndexIo` error (spec §7) rather than brought down the process —
    /// this is the production-shaped dictionary, not a test fixture.
    pub fn build(terms: Vec<(Vec<u8>, Vec<DocId>)>) -> Result<FstTermDictionary> {
        let mut builder = MapBuilder::memory();
        let mut postings = Vec::with_capacity(terms.len());
        for (ord, (term, docs)) in terms.into_iter().enumerate() {
            builder.insert(&term, ord as u64).map_err(convert_fst_error)?;
            postings.push(docs);
        }
        let bytes = builder.into_inner().map_err(convert_fst_error)?;
        let map = Map::new(bytes).map_err(convert_fst_error)?;
        Ok(FstTermDictionary { map, postings })
    }
}

impl TermDictionary for FstTermDictionary {
    fn cursor(&self) -> Box<dyn TermCursor + '_> {
        Box::new(FstTermCursor {
            dict: self,
            stream: None,
            current: None,
        })
    }
}

struct FstTermCursor<'a> {
    dict: &'a FstTermDictionary,
    stream: Option<fst::map::Stream<'a>>,
    current: Option<(Vec<u8>, u64)>,
}

impl<'a> FstTermCursor<'a> {
    fn pull(&mut self) -> bool {
        match self.stream.as_mut().and_then(|s| s.next()) {
            Some((term, ord)) => {
                self.current = Some((term.to_vec(), ord));
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }
}

impl<'a> TermCursor for FstTermCursor<'a> {
    fn seek_ceil(&mut self, term: &[u8]) -> SeekStatus {
        self.stream = Some(self.dict.map.range().ge(term).into_stream());
        if !self.pull() {
            return SeekStatus::End;
        }
        if self.current.as_ref().unwrap().0 == term {
            SeekStatus::Found
        } else {
            SeekStatus::NotFound
        }
    }

    fn next(&mut self) -> Option<()> {
        if self.stream.is_none() {
            self.stream = Some(self.dict.map.stream());
        }
        if self.pull() {
            Some(())
        } else {
            None
        }
    }

    fn term(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(t, _)| t.as_slice())
    }

    fn doc_freq(&self) -> u32 {
        self.current
            .as_ref()
            .map(|(_, ord)| self.dict.postings[*ord as usize].len() as u32)
            .unwrap_or(0)
    }

    fn postings(&self) -> Box<dyn DocSet> {
        let docs = self
            .current
            .as_ref()
            .map(|(_, ord)| self.dict.postings[*ord as usize].clone())
            .unwrap_or_default();
        Box::new(VecPostings::from(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::FstTermDictionary;
    use postings::DocSet;
    use termdict::{SeekStatus, TermCursor, TermDictionary};

    fn build() -> FstTermDictionary {
        FstTermDictionary::build(vec![
            (b"alpha".to_vec(), vec![0, 1]),
            (b"beta".to_vec(), vec![2]),
            (b"gamma".to_vec(), vec![3, 4, 5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_rejects_out_of_order_terms() {
        let result = FstTermDictionary::build(vec![(b"beta".to_vec(), vec![0]), (b"alpha".to_vec(), vec![1])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_seek_ceil_found_and_not_found() {
        let dict = build();
        let mut cursor = dict.cursor();
        assert_eq!(cursor.seek_ceil(b"beta"), SeekStatus::Found);
        assert_eq!(cursor.doc_freq(), 1);

        let mut cursor2 = dict.cursor();
        assert_eq!(cursor2.seek_ceil(b"b"), SeekStatus::NotFound);
        assert_eq!(cursor2.term(), Some(&b"beta"[..]));
    }

    #[test]
    fn test_seek_ceil_past_end() {
        let dict = build();
        let mut cursor = dict.cursor();
        assert_eq!(cursor.seek_ceil(b"zzz"), SeekStatus::End);
    }

    #[test]
    fn test_full_enumeration_order() {
        let dict = build();
        let mut cursor = dict.cursor();
        let mut terms = vec![];
        while cursor.next().is_some() {
            terms.push(cursor.term().unwrap().to_vec());
        }
        assert_eq!(terms, vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
    }

    #[test]
    fn test_postings_for_current_term() {
        let dict = build();
        let mut cursor = dict.cursor();
        cursor.seek_ceil(b"gamma");
        let mut postings = cursor.postings();
        let mut docs = vec![];
        while postings.advance() {
            docs.push(postings.doc());
        }
        assert_eq!(docs, vec![3, 4, 5]);
    }
}
