//! Error kinds for the join executor (see spec §7: Error Handling Design).
//!
//! The three kinds below are surfaced to the caller verbatim; none are
//! recovered locally. On any error, acquired searcher/core references are
//! released before the error propagates (see `join::driver` and
//! `core::ScopedFromCore`'s `Drop` impl), and any diagnostic counters
//! accumulated up to the point of failure are discarded.

use std::io;

error_chain! {
    foreign_links {
        Io(io::Error) #[doc = "wraps a term-dictionary or postings read failure"];
    }

    errors {
        /// Missing/unknown cross-shard target, a field absent from one of
        /// the two schemas, or a `from` field lacking the storage mode its
        /// schema type requires.
        BadRequest(msg: String) {
            description("bad join request")
            display("bad join request: {}", msg)
        }
        /// The caller aborted the join in progress (see spec §5).
        Aborted {
            description("join aborted by caller")
            display("join aborted by caller")
        }
    }
}
