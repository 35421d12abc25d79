//! Print Form - word-processor documents to print form templates
//!
//! This crate rewrites the XML parts of a document package according to a
//! declarative configuration: raw pattern replacements, wrapping of elements
//! located by tag and anchor, placeholder substitution and marker cleanup.
//! The result is written next to the source as `<stem>_PF<ext>`.
//!
//! # Example
//!
//! ```rust
//! use print_form::{BlockRule, Section, SectionTransform};
//!
//! let section = Section::new(["word/document.xml"])
//!     .with_block(BlockRule::new("w:p", "<%if%>", "<%end%>").with_mark("OPT"))
//!     .with_variable("client", "Client.Name");
//!
//! let transform = SectionTransform::compile(&section).unwrap();
//! let out = transform.apply("<w:p>##OPT##[#client#]</w:p>").unwrap();
//!
//! assert_eq!(out, "<%if%><w:p><%=XmlAttrEncode(Client.Name)%></w:p><%end%>");
//! ```

pub mod blocks;
pub mod config;
mod error;
pub mod marks;
pub mod package;
pub mod pipeline;
pub mod replace;
pub mod transform;
pub mod variables;

pub use blocks::BlockTransformer;
pub use config::{Anchor, BlockRule, Configuration, ReplaceRule, Section, Variables};
pub use error::{PrintFormError, Result};
pub use marks::strip_marks;
pub use package::{print_form_path, UnpackedPackage, PRINT_FORM_SUFFIX};
pub use pipeline::{PrintFormMaker, RunReport};
pub use replace::PatternReplacer;
pub use transform::SectionTransform;
pub use variables::substitute;
