use super::cursor;

/// A slice of a ranked candidate sequence plus the token to request the next
/// slice.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Cuts the `[offset, offset + limit)` window out of candidates ordered from
/// rank 0.
///
/// The continuation token is present iff the window came back full: a short
/// page proves exhaustion, a full page only suggests more items. A pool of
/// exactly `offset + limit` items therefore yields one extra cursor whose
/// next page is empty.
pub fn paginate<T>(candidates: Vec<T>, offset: usize, limit: usize) -> Page<T> {
    let items: Vec<T> = candidates.into_iter().skip(offset).take(limit).collect();

    let next_cursor = if items.len() == limit {
        Some(cursor::encode(offset + limit))
    } else {
        None
    };

    Page { items, next_cursor }
}
