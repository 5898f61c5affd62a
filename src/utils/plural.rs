//! Count formatting for log and report lines.

/// `"s"` unless `n` is exactly one.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `3 files`, `1 file`, `0 files`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}
