//! The outer driver (spec §4.7): the state machine that threads the
//! From-Side Classifier and the To-Side Accumulator together across both
//! term dictionaries. `Init`, `Iterating` and `Draining` are folded into
//! the control flow of [`run_join`] rather than named as an explicit enum
//! — there is exactly one thread of execution per invocation (spec §5),
//! so the states never need to be inspected from outside this function.

use docset::JoinSet;
use error::{Error, ErrorKind, Result};
use join::accumulate::Accumulator;
use join::classify::classify_from_term;
use join::thresholds::JoinThresholds;
use join::JoinCounters;
use termdict::{SeekStatus, TermCursor};
use DocId;

/// Runs one join invocation to completion: walks `from_cursor` term by
/// term (optionally restricted to `prefix`), classifies each against
/// `from_set` (spec §4.4), and for every term that passes routes the
/// matching to-side postings into the accumulator (spec §4.5). Returns
/// the finished result together with the diagnostic counters spec §6.4
/// wants surfaced.
///
/// `should_abort` is polled at the start of each to-side term iteration,
/// the minimum cancellation-observation point spec §5 asks for. On an
/// abort, the whole invocation fails with `ErrorKind::Aborted` and the
/// counters accumulated so far are discarded along with the partial
/// result (spec §5, §7: no partial result is ever surfaced).
pub fn run_join(
    from_cursor: &mut dyn TermCursor,
    to_cursor: &mut dyn TermCursor,
    from_set: &JoinSet,
    thresholds: &JoinThresholds,
    to_max_doc: usize,
    prefix: Option<&[u8]>,
    cached_from_term_set: impl Fn(&[u8]) -> Result<JoinSet>,
    cached_to_term_set: impl Fn(&[u8]) -> Result<JoinSet>,
    to_is_live: impl Fn(DocId) -> bool,
    should_abort: impl Fn() -> bool,
) -> Result<(JoinSet, JoinCounters)> {
    let mut counters = JoinCounters::default();
    let mut accumulator = Accumulator::new(to_max_doc);

    let mut has_from_term = match prefix {
        Some(p) => from_cursor.seek_ceil(p) != SeekStatus::End,
        None => from_cursor.next().is_some(),
    };

    while has_from_term {
        if should_abort() {
            return Err(Error::from(ErrorKind::Aborted));
        }

        let term = match from_cursor.term() {
            Some(t) => t.to_vec(),
            None => break,
        };
        if let Some(p) = prefix {
            if !term.starts_with(p) {
                break;
            }
        }

        let df_from = from_cursor.doc_freq();
        counters.from_term_count += 1;
        counters.from_term_total_df += df_from as u64;
        if df_from < thresholds.min_doc_freq_from {
            counters.from_term_direct_count += 1;
        }

        let hit = classify_from_term(
            df_from,
            thresholds,
            from_set,
            || from_cursor.postings(),
            || cached_from_term_set(&term),
        )?;

        let mut to_exhausted = false;
        if hit {
            counters.from_term_hits += 1;
            counters.from_term_hits_total_df += df_from as u64;

            match to_cursor.seek_ceil(&term) {
                SeekStatus::End => to_exhausted = true,
                SeekStatus::NotFound => {}
                SeekStatus::Found => {
                    let df_to = to_cursor.doc_freq();
                    counters.to_term_hits += 1;
                    counters.to_term_hits_total_df += df_to as u64;
                    accumulator.route_term(
                        df_to,
                        thresholds,
                        || cached_to_term_set(&term),
                        || to_cursor.postings(),
                        &to_is_live,
                        &mut counters,
                    )?;
                }
            }
        }

        has_from_term = from_cursor.next().is_some();
        if to_exhausted {
            break;
        }
    }

    Ok((accumulator.finalize(), counters))
}

#[cfg(test)]
mod tests {
    use super::run_join;
    use docset::{DenseBitDocSet, JoinSet, SortedIntDocSet};
    use join::thresholds::JoinThresholds;
    use termdict::{TermDictionary, VecTermDictionary};

    fn thresholds() -> JoinThresholds {
        JoinThresholds::new(5, 5, 16)
    }

    #[test]
    fn test_empty_from_side_yields_empty_result() {
        let from_dict = VecTermDictionary::from_sorted_terms(vec![]);
        let to_dict = VecTermDictionary::from_sorted_terms(vec![(b"a".to_vec(), vec![0])]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();
        let (result, counters) = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &JoinSet::Empty,
            &thresholds(),
            10,
            None,
            |_| unreachable!(),
            |_| unreachable!(),
            |_| true,
            || false,
        )
        .unwrap();
        assert_eq!(result.size(), 0);
        assert_eq!(counters.from_term_count, 0);
    }

    #[test]
    fn test_single_matching_term_joins_through() {
        // from-dict has one rare term "x" with postings [1, 2]; to-dict has
        // the same term with postings [10, 11]. from_set covers doc 1.
        let from_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![1, 2])]);
        let to_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![10, 11])]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();

        let mut from_set_bits = DenseBitDocSet::new(5);
        from_set_bits.insert(1);
        let from_set = JoinSet::Dense(from_set_bits);

        let (result, counters) = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &from_set,
            &thresholds(),
            20,
            None,
            |_| unreachable!("rare term takes the direct scan route"),
            || Ok(JoinSet::Sorted(SortedIntDocSet::from_sorted(vec![10, 11]))),
            |_| true,
            || false,
        )
        .unwrap();
        assert_eq!(counters.from_term_hits, 1);
        assert_eq!(counters.to_term_hits, 1);
        let mut docs: Vec<_> = result.iter().collect();
        docs.sort_unstable();
        assert_eq!(docs, vec![10, 11]);
    }

    #[test]
    fn test_non_matching_from_term_contributes_nothing() {
        let from_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![3])]);
        let to_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![10])]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();
        // from_set does not cover doc 3, so the term never passes classification.
        let from_set = JoinSet::Sorted(SortedIntDocSet::from_sorted(vec![99]));

        let (result, counters) = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &from_set,
            &thresholds(),
            20,
            None,
            |_| unreachable!(),
            |_| unreachable!("classification never passes, so the to side is never touched"),
            |_| true,
            || false,
        )
        .unwrap();
        assert_eq!(counters.from_term_hits, 0);
        assert_eq!(result.size(), 0);
    }

    #[test]
    fn test_prefix_restricts_iteration() {
        let from_dict = VecTermDictionary::from_sorted_terms(vec![
            (b"aa".to_vec(), vec![0]),
            (b"ab".to_vec(), vec![1]),
            (b"b".to_vec(), vec![2]),
        ]);
        let to_dict = VecTermDictionary::from_sorted_terms(vec![]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();
        let from_set = JoinSet::Empty;

        let (_result, counters) = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &from_set,
            &thresholds(),
            10,
            Some(b"a"),
            |_| unreachable!(),
            |_| unreachable!(),
            |_| true,
            || false,
        )
        .unwrap();
        // "b" must not be visited once the prefix stops matching.
        assert_eq!(counters.from_term_count, 2);
    }

    #[test]
    fn test_direct_route_respects_liveness_end_to_end() {
        // "x" is the first to-term seen, so rule 2 cache-routes it in as a
        // dense clone (resultBits is still absent) and resultBits now
        // exists. "y" is rare on the to side, so it then takes the direct
        // route, where liveness filtering must apply.
        let from_dict =
            VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![0]), (b"y".to_vec(), vec![1])]);
        let to_dict =
            VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![2]), (b"y".to_vec(), vec![7, 8])]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();

        let mut from_set_bits = DenseBitDocSet::new(5);
        from_set_bits.insert(0);
        from_set_bits.insert(1);
        let from_set = JoinSet::Dense(from_set_bits);

        let mut cached_x = DenseBitDocSet::new(10);
        cached_x.insert(2);

        let (result, counters) = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &from_set,
            &thresholds(),
            10,
            None,
            |_| unreachable!("both from-terms are rare and take the direct scan"),
            |term| {
                if term == b"x" {
                    Ok(JoinSet::Dense(cached_x.clone()))
                } else {
                    unreachable!("\"y\" is rare enough to take the direct route")
                }
            },
            |doc| doc != 8,
            || false,
        )
        .unwrap();
        assert_eq!(counters.to_term_direct_count, 1);
        let mut docs: Vec<_> = result.iter().collect();
        docs.sort_unstable();
        assert_eq!(docs, vec![2, 7]);
    }

    #[test]
    fn test_abort_flag_observed_before_first_term() {
        use error::ErrorKind;

        let from_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![0])]);
        let to_dict = VecTermDictionary::from_sorted_terms(vec![(b"x".to_vec(), vec![1])]);
        let mut from_cursor = from_dict.cursor();
        let mut to_cursor = to_dict.cursor();

        let err = run_join(
            &mut *from_cursor,
            &mut *to_cursor,
            &JoinSet::Empty,
            &thresholds(),
            10,
            None,
            |_| unreachable!("aborted before any term is classified"),
            |_| unreachable!(),
            |_| true,
            || true,
        )
        .unwrap_err();
        match err.kind() {
            ErrorKind::Aborted => {}
            other => panic!("expected Aborted, got {:?}", other),
        }
    }
}
