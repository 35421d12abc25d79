//! Section transforms
//!
//! A section is compiled once per run and then applied to each of its files.
//! The stages always run in the same order:
//!
//! 1. raw pattern replacement
//! 2. block wrapping
//! 3. placeholder substitution
//! 4. marker cleanup

use crate::blocks::BlockTransformer;
use crate::config::{Section, Variables};
use crate::error::Result;
use crate::marks::strip_marks;
use crate::replace::PatternReplacer;
use crate::variables::substitute;

/// A section with every pattern compiled
#[derive(Debug, Clone)]
pub struct SectionTransform {
    files: Vec<String>,
    replacer: PatternReplacer,
    blocks: BlockTransformer,
    variables: Option<Variables>,
}

impl SectionTransform {
    /// Compile a section, failing on the first malformed pattern
    pub fn compile(section: &Section) -> Result<Self> {
        Ok(Self {
            files: section.files.clone(),
            replacer: PatternReplacer::compile(&section.replacements)?,
            blocks: BlockTransformer::compile(&section.blocks)?,
            variables: section.variables.clone(),
        })
    }

    /// Compile every section of a configuration, in order
    pub fn compile_all(sections: &[Section]) -> Result<Vec<Self>> {
        sections.iter().map(Self::compile).collect()
    }

    /// Files this section rewrites, relative to the package root
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Run all stages over one file's text
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut content = if self.replacer.is_empty() {
            text.to_string()
        } else {
            self.replacer.apply(text)?
        };

        if !self.blocks.is_empty() {
            content = self.blocks.apply(&content)?;
        }

        if let Some(ref variables) = self.variables {
            content = substitute(&content, variables);
        }

        Ok(strip_marks(&content))
    }
}
