//! Document package I/O
//!
//! A word-processor document is a ZIP archive of XML parts. It is unpacked
//! into a uniquely named working directory, rewritten in place, and packed
//! again into the print form archive. The working directory is removed when
//! the [`UnpackedPackage`] is repacked or dropped, whichever comes first.

use crate::error::{PrintFormError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Suffix appended to the file stem of a print form
pub const PRINT_FORM_SUFFIX: &str = "_PF";

/// Package folder holding embedded images
const MEDIA_DIR: &str = "word/media/";

/// Prefix of working directory names
const WORK_DIR_PREFIX: &str = "print-form-";

/// `<dir>/<stem>_PF<ext>` next to the source document
pub fn print_form_path(source: &Path) -> Option<PathBuf> {
    let folder = source.parent()?;
    let stem = source.file_stem()?.to_str()?;

    let file_name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, PRINT_FORM_SUFFIX, ext),
        None => format!("{}{}", stem, PRINT_FORM_SUFFIX),
    };

    Some(folder.join(file_name))
}

/// Relative path of a working directory file as a ZIP entry name
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

/// A document extracted into its own working directory
#[derive(Debug)]
pub struct UnpackedPackage {
    dir: TempDir,
    /// File entries in the order of the source archive
    entries: Vec<String>,
}

impl UnpackedPackage {
    /// Extract `archive` into a fresh directory under `work_root`
    pub fn unpack_in(archive: impl AsRef<Path>, work_root: impl AsRef<Path>) -> Result<Self> {
        let archive = archive.as_ref();
        let work_root = work_root.as_ref();

        std::fs::create_dir_all(work_root)?;
        let dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir_in(work_root)?;

        let mut zip = ZipArchive::new(File::open(archive)?)?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let file = zip.by_index(i)?;
            if !file.is_dir() {
                entries.push(file.name().to_string());
            }
        }

        zip.extract(dir.path())?;

        tracing::debug!(
            "Unpacked {} ({} entries) into {}",
            archive.display(),
            entries.len(),
            dir.path().display()
        );

        Ok(Self { dir, entries })
    }

    /// Root of the working directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a part inside the working directory
    pub fn part_path(&self, part: &str) -> PathBuf {
        self.dir.path().join(part)
    }

    /// Read a part as text
    pub fn read_part(&self, part: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.part_path(part))?)
    }

    /// Overwrite a part
    pub fn write_part(&self, part: &str, content: &str) -> Result<()> {
        std::fs::write(self.part_path(part), content)?;
        Ok(())
    }

    /// Source entries that still exist first, then new files in name order
    fn packing_order(&self) -> Result<Vec<String>> {
        let root = self.dir.path();
        let mut on_disk = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry_name(root, entry.path()).ok_or_else(|| {
                PrintFormError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("non UTF-8 path in package: {}", entry.path().display()),
                ))
            })?;
            on_disk.push(name);
        }

        let present: HashSet<&str> = on_disk.iter().map(String::as_str).collect();
        let known: HashSet<&str> = self.entries.iter().map(String::as_str).collect();

        let mut order: Vec<String> = self
            .entries
            .iter()
            .filter(|name| present.contains(name.as_str()))
            .cloned()
            .collect();
        order.extend(on_disk.iter().filter(|name| !known.contains(name.as_str())).cloned());

        Ok(order)
    }

    /// Pack the working directory into `output`, replacing any existing
    /// file, then remove the working directory
    pub fn repack(self, output: impl AsRef<Path>) -> Result<()> {
        let output = output.as_ref();
        let order = self.packing_order()?;

        if output.exists() {
            std::fs::remove_file(output)?;
        }

        let mut zip = ZipWriter::new(File::create(output)?);
        let deflated = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        // Media is already compressed
        let stored = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

        for name in &order {
            let data = std::fs::read(self.part_path(name))?;
            let options = if name.starts_with(MEDIA_DIR) { stored } else { deflated };
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&data)?;
        }

        zip.finish()?;
        tracing::debug!("Packed {} entries into {}", order.len(), output.display());

        self.dir.close()?;
        Ok(())
    }
}
