//! Marker cleanup
//!
//! `##name##` markers only anchor block rules. They are removed from every
//! processed file once all other rules have run.

use regex_lite::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

const MARK_PATTERN: &str = r"##(?s:.*?)##";

/// Marker text for a mark name
pub fn marker(name: &str) -> String {
    format!("##{}##", name)
}

fn mark_regex() -> &'static Regex {
    static MARKS: OnceLock<Regex> = OnceLock::new();
    MARKS.get_or_init(|| Regex::new(MARK_PATTERN).expect("mark pattern is valid"))
}

/// Remove every `##...##` span, shortest match first
pub fn strip_marks(text: &str) -> String {
    match mark_regex().replace_all(text, "") {
        Cow::Borrowed(_) => text.to_string(),
        Cow::Owned(stripped) => stripped,
    }
}
