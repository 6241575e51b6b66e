//! Canonicalization of raw user text into safe local-part fragments.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile whitespace regex. This should not happen.")
});

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9._-]").expect("Failed to compile charset regex. This should not happen.")
});

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[._-]{2,}").expect("Failed to compile separator regex. This should not happen.")
});

/// Canonicalizes arbitrary text into a local-part fragment.
///
/// Trims surrounding whitespace, lowercases, removes internal whitespace,
/// strips every character outside `[a-z0-9._-]`, and collapses any run of
/// two or more consecutive separator characters (`.`, `_`, `-`, possibly
/// mixed) into the first character of that run.
///
/// Idempotent and total: never fails, and `normalize(normalize(x)) ==
/// normalize(x)` for all inputs. Empty input yields `""`.
pub(crate) fn normalize(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let compact = WHITESPACE.replace_all(&lowered, "");
    let safe = UNSAFE_CHARS.replace_all(&compact, "");
    SEPARATOR_RUN
        .replace_all(&safe, |caps: &Captures| caps[0][..1].to_string())
        .into_owned()
}

/// Formats a raw name field for output records.
///
/// Distinct from [`normalize`]: internal whitespace runs are collapsed, a
/// two-word name keeps a single joining space, and any other multi-word
/// form concatenates with no spaces.
pub(crate) fn display_name(s: &str) -> String {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() == 2 {
        parts.join(" ")
    } else {
        parts.concat()
    }
}
