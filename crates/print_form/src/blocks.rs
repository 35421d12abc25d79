//! Block wrapping
//!
//! A block rule locates an XML element by tag and anchor and inserts text
//! around it without touching the element itself:
//!
//! ```text
//! preRE <tag ...> ... anchor ... </tag> postRE
//! ```
//!
//! becomes `before` + the matched span + `after`.
//!
//! Between the opening tag and the anchor no `</tag>` and no nested `<tag`
//! may start, so the innermost element holding the anchor is chosen and a
//! match never crosses a closing tag of the same name. After the anchor, the
//! nearest `</tag>` followed by `postRE` closes the element. The whole rule is
//! one backtracking regex, so a variable-length `preRE` may reach past the
//! first `<tag` it meets.

use crate::config::BlockRule;
use crate::error::{PrintFormError, Result};
use crate::replace::build_regex;
use fancy_regex::{escape, Regex};

/// Element pattern source for a rule
fn element_pattern(rule: &BlockRule) -> String {
    let tag = escape(&rule.tag);
    let opening = format!("<{}(?=[\\s/>])", tag);
    let closing = format!("</{}>", tag);

    let mut pattern = String::new();
    if let Some(pre) = rule.preceding_pattern.as_deref().filter(|p| !p.is_empty()) {
        pattern.push_str(&format!("(?:{})", pre));
    }
    pattern.push_str(&opening);
    if let Some(anchor) = rule.anchor().to_pattern() {
        // Characters up to the anchor: no closing tag, no nested opening tag
        pattern.push_str(&format!("(?:(?!{})(?!<{}[\\s/>]).)*?(?:{})", closing, tag, anchor));
    }
    pattern.push_str(".*?");
    pattern.push_str(&closing);
    if let Some(post) = rule.following_pattern.as_deref().filter(|p| !p.is_empty()) {
        pattern.push_str(&format!("(?:{})", post));
    }

    pattern
}

/// One compiled, active block rule
#[derive(Debug, Clone)]
struct CompiledBlock {
    tag: String,
    source: String,
    element: Regex,
    before: String,
    after: String,
}

impl CompiledBlock {
    fn compile(rule: &BlockRule) -> Result<Self> {
        // Each fragment must stand on its own before it is spliced in
        let anchor = rule.anchor().to_pattern();
        let fragments = [
            rule.preceding_pattern.as_deref(),
            anchor.as_deref(),
            rule.following_pattern.as_deref(),
        ];
        for fragment in fragments.into_iter().flatten() {
            build_regex(fragment)?;
        }

        let source = element_pattern(rule);
        let element = build_regex(&source)?;

        Ok(Self {
            tag: rule.tag.clone(),
            source,
            element,
            before: rule.before_text.clone(),
            after: rule.after_text.clone(),
        })
    }

    /// Wrap every non-overlapping match, left to right
    fn apply(&self, text: &str) -> Result<(String, usize)> {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut count = 0;

        loop {
            let found = self
                .element
                .find_from_pos(text, copied)
                .map_err(|e| PrintFormError::pattern_failed(&self.source, e))?;
            let Some(m) = found else {
                break;
            };

            out.push_str(&text[copied..m.start()]);
            out.push_str(&self.before);
            out.push_str(m.as_str());
            out.push_str(&self.after);
            // Never empty: every match holds `<tag`
            copied = m.end();
            count += 1;
        }

        out.push_str(&text[copied..]);
        Ok((out, count))
    }
}

/// Ordered block rules of one section
#[derive(Debug, Clone, Default)]
pub struct BlockTransformer {
    blocks: Vec<CompiledBlock>,
}

impl BlockTransformer {
    /// Compile the active rules; skipped rules are dropped unchecked
    pub fn compile(rules: &[BlockRule]) -> Result<Self> {
        let mut blocks = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.skip {
                tracing::debug!("Skipping block rule for <{}>", rule.tag);
                continue;
            }
            blocks.push(CompiledBlock::compile(rule)?);
        }

        Ok(Self { blocks })
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Apply the rules in order, each one seeing the previous output
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut content = text.to_string();

        for block in &self.blocks {
            let (wrapped, count) = block.apply(&content)?;
            tracing::debug!("Block rule for <{}> wrapped {} element(s)", block.tag, count);
            content = wrapped;
        }

        Ok(content)
    }
}
