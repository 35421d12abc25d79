//! Document pipeline
//!
//! Loads a configuration, then converts each listed document in turn:
//! unpack, run every section over its files, repack as `<stem>_PF<ext>`.
//! The first failure stops the run; print forms already written stay.

use crate::config::Configuration;
use crate::error::{PrintFormError, Result};
use crate::package::{print_form_path, UnpackedPackage};
use crate::transform::SectionTransform;
use std::path::{Path, PathBuf};

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Print forms written, in configuration order
    pub outputs: Vec<PathBuf>,
}

/// Converts documents into print forms
#[derive(Debug, Clone)]
pub struct PrintFormMaker {
    /// Directory under which per-document working directories are created
    work_root: PathBuf,
}

impl Default for PrintFormMaker {
    fn default() -> Self {
        Self {
            work_root: std::env::temp_dir(),
        }
    }
}

impl PrintFormMaker {
    /// Create a maker using the system temp directory for working files
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a maker with working directories under `work_root`
    pub fn with_work_root(work_root: impl Into<PathBuf>) -> Self {
        Self {
            work_root: work_root.into(),
        }
    }

    /// Run the configuration file at `config_path`
    pub fn make_print_form(&self, config_path: impl AsRef<Path>) -> Result<RunReport> {
        let config_path = config_path.as_ref();

        if !config_path.is_file() {
            return Err(PrintFormError::ConfigNotFound(config_path.to_path_buf()));
        }

        let base_dir = config_path
            .parent()
            .ok_or_else(|| PrintFormError::ConfigDirectoryUnresolvable(config_path.to_path_buf()))?;

        let config = Configuration::load_file(config_path)?;
        tracing::info!(
            "Loaded {} with {} document(s) and {} section(s)",
            config_path.display(),
            config.documents.len(),
            config.sections.len()
        );

        self.run(&config, base_dir)
    }

    /// Run a configuration whose document paths are relative to `base_dir`
    pub fn run(&self, config: &Configuration, base_dir: &Path) -> Result<RunReport> {
        config.validate()?;
        let sections = SectionTransform::compile_all(&config.sections)?;

        let mut report = RunReport::default();

        for document in &config.documents {
            let source = base_dir.join(document);

            if !source.is_file() {
                return Err(PrintFormError::SourceDocumentNotFound(document.clone()));
            }

            let output = self.convert_document(&source, document, &sections)?;
            report.outputs.push(output);
        }

        Ok(report)
    }

    /// Convert one document, returning the print form path
    pub fn convert_document(
        &self,
        source: &Path,
        document: &str,
        sections: &[SectionTransform],
    ) -> Result<PathBuf> {
        let output = print_form_path(source)
            .ok_or_else(|| PrintFormError::OutputPathUnresolvable(source.to_path_buf()))?;

        tracing::info!("Converting {} under {}", source.display(), self.work_root.display());
        let package = UnpackedPackage::unpack_in(source, &self.work_root)?;

        for section in sections {
            for file in section.files() {
                if !package.part_path(file).is_file() {
                    return Err(PrintFormError::SectionFileNotFound {
                        document: document.to_string(),
                        file: file.clone(),
                    });
                }

                tracing::debug!("Transforming {} in {}", file, document);
                let content = package.read_part(file)?;
                package.write_part(file, &section.apply(&content)?)?;
            }
        }

        package.repack(&output)?;
        tracing::info!("Wrote {}", output.display());

        Ok(output)
    }
}
