//! Page number resolution for untrusted client input

/// Resolve a raw `page` query value to a page number >= 1.
///
/// Anything that is not a decimal integer in `i64` range, or is below 1,
/// resolves to the first page. There is no upper bound.
pub fn resolve_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .map_or(1, |page| page as u64)
}
