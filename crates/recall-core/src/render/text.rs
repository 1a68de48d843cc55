//! Text cleanup and length limits.
//!
//! All lengths are counted in `char`s, so a kanji costs the same as a Latin
//! letter.

use std::sync::LazyLock;

use regex::Regex;

/// Marker appended or substituted when text is cut.
pub const ELLIPSIS: &str = "...";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Remove every `<...>` span, then collapse whitespace runs to one space.
///
/// Tags are removed first so `a <b>x</b> c` does not leave a double space.
/// Idempotent.
#[must_use]
pub fn strip_html(text: &str) -> String {
    let without_tags = TAG.replace_all(text, "");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// Keep the first `limit` chars and append [`ELLIPSIS`] when anything was cut.
#[must_use]
pub fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Hard cap: the result never exceeds `cap` chars. On overflow the last
/// three chars of the result are [`ELLIPSIS`].
#[must_use]
pub fn cap_with_ellipsis(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let marker_len = ELLIPSIS.chars().count();
    if cap < marker_len {
        return ELLIPSIS.chars().take(cap).collect();
    }
    let mut out: String = text.chars().take(cap - marker_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Cleaned mnemonic text for display.
#[must_use]
pub fn clean_mnemonic(raw: &str, limit: usize) -> String {
    shorten(&strip_html(raw), limit)
}
