use DocId;

/// The three routing thresholds of spec §4.6, computed once per
/// invocation from each side's `max_doc`. Threshold invariance (spec §8)
/// means these never change the *result*, only which accumulation path a
/// given term takes — so property tests construct `JoinThresholds`
/// directly via [`JoinThresholds::new`] to probe values the derived
/// constructor would never produce.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct JoinThresholds {
    /// from-term `df` below this uses the direct postings scan (§4.4).
    pub min_doc_freq_from: u32,
    /// to-term `df` below this is eligible for the direct-write route,
    /// once `resultBits` exists (§4.5 rule 3).
    pub min_doc_freq_to: u32,
    /// cumulative small-set size above which the accumulator must
    /// promote to a dense bitset (§4.5 rule 1).
    pub max_sorted_int_size: usize,
}

impl JoinThresholds {
    pub fn new(min_doc_freq_from: u32, min_doc_freq_to: u32, max_sorted_int_size: usize) -> JoinThresholds {
        JoinThresholds {
            min_doc_freq_from,
            min_doc_freq_to,
            max_sorted_int_size,
        }
    }

    /// The derived thresholds spec §4.6 defines: `max(5, maxDoc >> 13)` for
    /// the two df cutoffs, `max(10, toMaxDoc >> 10)` for the promotion
    /// size.
    pub fn for_max_docs(from_max_doc: DocId, to_max_doc: DocId) -> JoinThresholds {
        JoinThresholds {
            min_doc_freq_from: (from_max_doc >> 13).max(5),
            min_doc_freq_to: (to_max_doc >> 13).max(5),
            max_sorted_int_size: ((to_max_doc >> 10) as usize).max(10),
        }
    }
}
