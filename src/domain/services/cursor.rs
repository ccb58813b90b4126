//! Opaque continuation tokens for feed pagination.
//!
//! A cursor encodes a non-negative offset into the deterministically ordered
//! candidate sequence of one strategy + filter combination. Cursors are not
//! portable across strategies or filters: callers must keep the same
//! parameters from page to page.

/// Encodes a pagination offset as a continuation token.
pub fn encode(offset: usize) -> String {
    offset.to_string()
}

/// Decodes a continuation token back into an offset.
///
/// A missing, malformed or negative token falls back to the start of the
/// feed. Decoding never fails: a bad cursor restarts the scroll, it does not
/// break the request.
pub fn decode(token: Option<&str>) -> usize {
    token
        .and_then(|token| token.trim().parse::<usize>().ok())
        .unwrap_or(0)
}
