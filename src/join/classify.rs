//! The From-Side Classifier (spec §4.4): "does this from-term intersect
//! the from-side set defined by `Q`?"

use docset::{Bits, JoinSet};
use error::Result;
use join::thresholds::JoinThresholds;
use postings::DocSet;

/// Decides whether the from-term with document frequency `df_from`
/// intersects `from_set`.
///
/// Rare terms (`df_from < thresholds.min_doc_freq_from`) are resolved by
/// scanning the term's postings directly and probing each doc id against
/// `from_set`'s random-access membership view, stopping at the first hit.
/// Live-docs filtering is intentionally skipped here: `from_set` already
/// restricts to live documents matching `Q`, so a deleted doc can never be
/// a member of it regardless of whether the postings scan surfaces it.
///
/// Common terms instead fetch the cached doc-set for `(from, t)` and test
/// set intersection against `from_set` — the cache amortizes across
/// repeated queries for the terms where a postings scan would be
/// relatively more expensive.
pub fn classify_from_term(
    df_from: u32,
    thresholds: &JoinThresholds,
    from_set: &JoinSet,
    open_postings: impl FnOnce() -> Box<dyn DocSet>,
    cached_from_term_set: impl FnOnce() -> Result<JoinSet>,
) -> Result<bool> {
    if df_from < thresholds.min_doc_freq_from {
        let view = match from_set.membership_view() {
            Some(view) => view,
            None => return Ok(false),
        };
        let mut postings = open_postings();
        while postings.advance() {
            if view.get(postings.doc()) {
                return Ok(true);
            }
        }
        Ok(false)
    } else {
        let cached = cached_from_term_set()?;
        Ok(from_set.intersects(&cached))
    }
}
