//! Rewrites release notes: keep the header, replace the body with a new
//! version-stamped entry.

use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::error::{CoreError, ValidationError};
use super::release_note::{self, VersionStamp};

/// The outcome for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub filename: String,
    pub ok: bool,
    pub error_message: String,
}

impl UpdateResult {
    fn success(filename: String) -> Self {
        Self {
            filename,
            ok: true,
            error_message: String::new(),
        }
    }

    fn failure(filename: String, error: &CoreError) -> Self {
        Self {
            filename,
            ok: false,
            error_message: error.to_string(),
        }
    }
}

/// Per-file results of one submitted update, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub stamp: String,
    pub results: Vec<UpdateResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| !r.ok)
    }
}

/// A validated update request: the stamp and body every target receives.
#[derive(Debug, Clone)]
pub struct ReleaseUpdate {
    stamp: VersionStamp,
    body: String,
}

impl ReleaseUpdate {
    /// Validates before anything touches the disk.
    pub fn new(stamp: &VersionStamp, body: &str) -> Result<Self, CoreError> {
        let stamp = stamp.validated()?;
        let body = body.trim();
        if body.is_empty() {
            return Err(ValidationError::EmptyBody.into());
        }
        Ok(Self {
            stamp,
            body: body.to_string(),
        })
    }

    pub fn stamp(&self) -> &VersionStamp {
        &self.stamp
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Rewrites one file and reports the outcome.
    pub fn apply(&self, path: &Path) -> UpdateResult {
        let filename = display_name(path);
        match self.write_note(path) {
            Ok(()) => {
                tracing::info!("Updated {:?} with {}", path, self.stamp);
                UpdateResult::success(filename)
            }
            Err(e) => {
                tracing::warn!("Update of {:?} failed: {}", path, e);
                UpdateResult::failure(filename, &e)
            }
        }
    }

    /// Applies the update to every path. A failure never stops the rest.
    pub fn apply_all(&self, paths: &[PathBuf]) -> BatchReport {
        BatchReport {
            stamp: self.stamp.to_string(),
            results: paths.iter().map(|path| self.apply(path)).collect(),
        }
    }

    fn write_note(&self, path: &Path) -> Result<(), CoreError> {
        let existing = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(CoreError::Read(e, path.to_path_buf())),
        };
        let header = release_note::header_block(&existing);
        let output = release_note::compose(&header, &self.stamp, &self.body);
        write_whole_file(path, &output)
    }
}

/// Writes through a temp file in the same directory so the target is either
/// fully replaced or left untouched.
///
/// An existing target must be writable; its permissions carry over to the
/// new content and a symlink is followed to the file it points at.
fn write_whole_file(path: &Path, content: &str) -> Result<(), CoreError> {
    let write_err = |e: io::Error| CoreError::Write(e, path.to_path_buf());
    let (target, permissions) = match fs::metadata(path) {
        Ok(meta) => {
            if meta.permissions().readonly() {
                return Err(write_err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "file is read-only",
                )));
            }
            // Replacing the entry only needs directory access; the file
            // itself has to accept writes too.
            OpenOptions::new().write(true).open(path).map_err(write_err)?;
            (fs::canonicalize(path).map_err(write_err)?, Some(meta.permissions()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(e) => return Err(write_err(e)),
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Updates a single file. Invalid input yields a failed result and no write.
pub fn update_one(path: &Path, stamp: &VersionStamp, body: &str) -> UpdateResult {
    match ReleaseUpdate::new(stamp, body) {
        Ok(update) => update.apply(path),
        Err(e) => UpdateResult::failure(display_name(path), &e),
    }
}

/// Updates every path independently. Validation failure aborts the whole
/// batch before any file is touched.
pub fn update_batch(
    paths: &[PathBuf],
    stamp: &VersionStamp,
    body: &str,
) -> Result<BatchReport, CoreError> {
    let update = ReleaseUpdate::new(stamp, body)?;
    Ok(update.apply_all(paths))
}
