//! An explicit snapshot of one opened folder.
//!
//! A `Session` is created when a folder is selected and replaced wholesale on
//! the next folder change or rescan. It never mutates in place.

use std::path::{Path, PathBuf};

use super::error::CoreError;
use super::scanner;
use super::tokens::{self, FilterOutcome, FilterSelection};
use super::FileEntry;

#[derive(Debug, Clone)]
pub struct Session {
    folder: PathBuf,
    preview_lines: usize,
    files: Vec<FileEntry>,
    primary_tokens: Vec<String>,
}

impl Session {
    /// Scans `folder` and derives its token index.
    pub fn open(folder: impl Into<PathBuf>, preview_lines: usize) -> Result<Self, CoreError> {
        let folder = folder.into();
        let files = scanner::scan_directory(&folder, preview_lines)?;
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        let primary_tokens = tokens::build_primary_tokens(&names);
        Ok(Self {
            folder,
            preview_lines,
            files,
            primary_tokens,
        })
    }

    /// Re-reads the same folder into a fresh session.
    pub fn rescan(&self) -> Result<Self, CoreError> {
        Self::open(self.folder.clone(), self.preview_lines)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn primary_tokens(&self) -> &[String] {
        &self.primary_tokens
    }

    pub fn secondary_tokens(&self, primary: &str) -> Vec<String> {
        tokens::build_secondary_tokens(&self.file_names(), primary)
    }

    pub fn filter(&self, selection: &FilterSelection) -> FilterOutcome {
        tokens::filter_files(&self.file_names(), selection)
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }
}
