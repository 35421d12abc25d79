//! Raw pattern replacement
//!
//! Applies `re` / `newText` rules to the whole file text, one after another.
//! Rule patterns may use look-around and backreferences.

use crate::config::ReplaceRule;
use crate::error::{PrintFormError, Result};
use fancy_regex::{Regex, RegexBuilder};

/// Backtracking steps one search may take before the pattern gives up
const BACKTRACK_LIMIT: usize = 10_000_000;

/// Compile a rule pattern with `.` matching line breaks
pub(crate) fn build_regex(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&format!("(?s){}", pattern))
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()
        .map_err(|e| PrintFormError::invalid_pattern(pattern, e))
}

/// Rewrite bare numbered group references so that `$1abc` means group 1
/// followed by `abc`, not a group named `1abc`
fn normalize_group_refs(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                out.push_str("${");
                out.push_str(&digits);
                out.push('}');
            }
            _ => out.push('$'),
        }
    }

    out
}

#[derive(Debug, Clone)]
struct CompiledReplace {
    pattern: String,
    regex: Regex,
    replacement: String,
}

/// Ordered list of compiled replacement rules
#[derive(Debug, Clone, Default)]
pub struct PatternReplacer {
    rules: Vec<CompiledReplace>,
}

impl PatternReplacer {
    /// Compile all rules, failing on the first malformed pattern
    pub fn compile(rules: &[ReplaceRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledReplace {
                    pattern: rule.pattern.clone(),
                    regex: build_regex(&rule.pattern)?,
                    replacement: normalize_group_refs(&rule.replacement),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Apply every rule in order; each rule sees the previous rule's output
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut content = text.to_string();

        for rule in &self.rules {
            content = rule
                .regex
                .try_replacen(&content, 0, rule.replacement.as_str())
                .map_err(|e| PrintFormError::pattern_failed(&rule.pattern, e))?
                .into_owned();
        }

        Ok(content)
    }
}
