//! Print form configuration
//!
//! A configuration lists the documents to convert and the sections of rules
//! applied to files inside each document. It is written in relaxed JSON
//! (Hjson), so comments, quoteless strings and missing commas are accepted:
//!
//! ```text
//! {
//!   docxFiles: ["contract.docx"]
//!   sections: [
//!     {
//!       files: ["word/document.xml"]
//!       vars: { clientName: "Client.Name" }
//!       blocks: [ { mark: "ROW", tag: "w:tr", before: "<% for %>", after: "<% end %>" } ]
//!       replace: [ { re: "<w:proofErr[^>]*/>", newText: "" } ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{PrintFormError, Result};
use crate::marks::marker;
use crate::variables::placeholder;
use fancy_regex::escape;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered variable bindings, name to raw JSON value
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Complete configuration of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Documents to convert, relative to the configuration file's directory
    #[serde(rename = "docxFiles")]
    pub documents: Vec<String>,
    /// Rule sections, applied to every document in order
    pub sections: Vec<Section>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document path
    pub fn with_document(mut self, path: impl Into<String>) -> Self {
        self.documents.push(path.into());
        self
    }

    /// Add a rule section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Parse a relaxed JSON configuration and validate it
    pub fn parse(text: &str) -> Result<Self> {
        let config: Configuration = deser_hjson::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(PrintFormError::ConfigNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(PrintFormError::ConfigParse(
                "docxFiles must list at least one document".to_string(),
            ));
        }

        if self.sections.is_empty() {
            tracing::warn!("Configuration has no sections, documents will only be repackaged");
        }

        for (i, section) in self.sections.iter().enumerate() {
            if section.files.is_empty() {
                tracing::warn!("Section {} lists no files", i);
            }
            for (j, block) in section.blocks.iter().enumerate() {
                if block.tag.trim().is_empty() {
                    return Err(PrintFormError::ConfigParse(format!(
                        "sections[{}].blocks[{}].tag must not be empty",
                        i, j
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A group of files sharing one set of rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Files inside the unpacked document, relative to the package root
    pub files: Vec<String>,
    /// Placeholder bindings
    #[serde(rename = "vars", default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
    /// Element wrapping rules
    #[serde(default)]
    pub blocks: Vec<BlockRule>,
    /// Raw pattern replacements
    #[serde(rename = "replace", default)]
    pub replacements: Vec<ReplaceRule>,
}

impl Section {
    /// Create a section targeting the given files
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Bind a variable
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.variables
            .get_or_insert_with(Variables::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a block rule
    pub fn with_block(mut self, block: BlockRule) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add a replacement rule
    pub fn with_replacement(mut self, rule: ReplaceRule) -> Self {
        self.replacements.push(rule);
        self
    }
}

/// Wraps an XML element located by its tag and anchor content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockRule {
    /// Disables the rule when true
    #[serde(default)]
    pub skip: bool,
    /// Anchor on the `[#name#]` placeholder
    #[serde(rename = "var", default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    /// Anchor on the `##name##` marker
    #[serde(rename = "mark", default, skip_serializing_if = "Option::is_none")]
    pub mark_name: Option<String>,
    /// Element name, e.g. `w:p`
    pub tag: String,
    /// Pattern that must directly follow the closing tag
    #[serde(rename = "postRE", default, skip_serializing_if = "Option::is_none")]
    pub following_pattern: Option<String>,
    /// Pattern that must directly precede the opening tag
    #[serde(rename = "preRE", default, skip_serializing_if = "Option::is_none")]
    pub preceding_pattern: Option<String>,
    /// Text inserted before the matched span
    #[serde(rename = "before")]
    pub before_text: String,
    /// Text inserted after the matched span
    #[serde(rename = "after")]
    pub after_text: String,
    /// Anchor on a regex fragment
    #[serde(rename = "text", default, skip_serializing_if = "Option::is_none")]
    pub literal_text: Option<String>,
}

impl BlockRule {
    /// Create a rule wrapping `tag` elements
    pub fn new(
        tag: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            before_text: before.into(),
            after_text: after.into(),
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    pub fn with_mark(mut self, name: impl Into<String>) -> Self {
        self.mark_name = Some(name.into());
        self
    }

    pub fn with_text(mut self, fragment: impl Into<String>) -> Self {
        self.literal_text = Some(fragment.into());
        self
    }

    pub fn with_preceding(mut self, pattern: impl Into<String>) -> Self {
        self.preceding_pattern = Some(pattern.into());
        self
    }

    pub fn with_following(mut self, pattern: impl Into<String>) -> Self {
        self.following_pattern = Some(pattern.into());
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Resolve the anchor; a variable wins over a mark, a mark over text
    pub fn anchor(&self) -> Anchor<'_> {
        if let Some(ref name) = self.variable_name {
            Anchor::Variable(name)
        } else if let Some(ref name) = self.mark_name {
            Anchor::Mark(name)
        } else if let Some(ref fragment) = self.literal_text {
            Anchor::Pattern(fragment)
        } else {
            Anchor::Empty
        }
    }
}

/// Content used to locate an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    /// `[#name#]` placeholder
    Variable(&'a str),
    /// `##name##` marker
    Mark(&'a str),
    /// Caller-supplied regex fragment
    Pattern(&'a str),
    /// No anchor; the nearest closing tag ends the element
    Empty,
}

impl Anchor<'_> {
    /// Regex source for this anchor, `None` when empty
    pub fn to_pattern(&self) -> Option<String> {
        match self {
            Anchor::Variable(name) => Some(escape(&placeholder(name)).into_owned()),
            Anchor::Mark(name) => Some(escape(&marker(name)).into_owned()),
            Anchor::Pattern(fragment) if fragment.is_empty() => None,
            Anchor::Pattern(fragment) => Some(fragment.to_string()),
            Anchor::Empty => None,
        }
    }
}

/// Regex find/replace over the raw file text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaceRule {
    /// Pattern to find
    #[serde(rename = "re")]
    pub pattern: String,
    /// Replacement, may reference capture groups
    #[serde(rename = "newText")]
    pub replacement: String,
}

impl ReplaceRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}
