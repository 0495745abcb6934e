//! Derives cascading filter tokens from release note file names.
//!
//! A name such as `fep-batch-task.txt` is split on `-`. The segment at index 1
//! (`batch`) is the primary token and the segment at index 2 (`task`) is the
//! secondary token. Everything from the first `.` onward is stripped from a
//! segment before it is compared, so `fep-batch.txt` also yields `batch`.
//!
//! All functions here are pure: they take file names and keys and return new
//! values, holding no reference to any UI object.

use serde::Serialize;
use std::collections::BTreeSet;

pub const SEGMENT_DELIMITER: char = '-';

/// The cleaned token segments of one file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTokens<'a> {
    pub primary: Option<&'a str>,
    pub secondary: Option<&'a str>,
}

/// Strips everything from the first `.` onward.
fn clean_segment(raw: &str) -> &str {
    match raw.find('.') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Splits a file name into its cleaned primary and secondary segments.
///
/// A segment that is empty after cleaning counts as absent.
pub fn name_tokens(file_name: &str) -> NameTokens<'_> {
    let mut parts = file_name.split(SEGMENT_DELIMITER).skip(1);
    let mut next_token = || parts.next().map(clean_segment).filter(|s| !s.is_empty());
    let primary = next_token();
    let secondary = next_token();
    NameTokens { primary, secondary }
}

/// Returns `true` when the file has at least two dash-separated segments.
fn has_primary_segment(file_name: &str) -> bool {
    file_name.contains(SEGMENT_DELIMITER)
}

fn with_empty_entry(tokens: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(String::new())
        .chain(tokens.into_iter().map(str::to_string))
        .collect()
}

/// Builds the sorted, deduplicated primary token list, led by `""`.
pub fn build_primary_tokens<S: AsRef<str>>(file_names: &[S]) -> Vec<String> {
    let tokens: BTreeSet<&str> = file_names
        .iter()
        .filter_map(|name| name_tokens(name.as_ref()).primary)
        .collect();
    with_empty_entry(tokens)
}

/// Builds the secondary token list for the given primary key, led by `""`.
///
/// Must be recomputed whenever the primary key changes.
pub fn build_secondary_tokens<S: AsRef<str>>(file_names: &[S], primary_key: &str) -> Vec<String> {
    let primary_key = primary_key.trim();
    let tokens: BTreeSet<&str> = file_names
        .iter()
        .map(|name| name_tokens(name.as_ref()))
        .filter(|tokens| primary_key.is_empty() || tokens.primary == Some(primary_key))
        .filter_map(|tokens| tokens.secondary)
        .collect();
    with_empty_entry(tokens)
}

/// The primary and secondary keys currently chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl FilterSelection {
    /// Trims both keys; blank keys mean "no filter".
    pub fn new(primary: &str, secondary: &str) -> Self {
        let normalize = |key: &str| {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_string())
        };
        Self {
            primary: normalize(primary),
            secondary: normalize(secondary),
        }
    }

    pub fn primary_key(&self) -> &str {
        self.primary.as_deref().unwrap_or("")
    }

    pub fn secondary_key(&self) -> &str {
        self.secondary.as_deref().unwrap_or("")
    }

    /// Returns `true` if the file name satisfies both keys.
    ///
    /// Names without a `-` never match, even with both keys empty. A file
    /// without a secondary segment never matches a non-empty secondary key.
    pub fn matches(&self, file_name: &str) -> bool {
        if !has_primary_segment(file_name) {
            return false;
        }
        if self.primary.is_none() && self.secondary.is_none() {
            return true;
        }
        let tokens = name_tokens(file_name);
        let primary_ok = match &self.primary {
            None => true,
            Some(key) => tokens.primary == Some(key.as_str()),
        };
        let secondary_ok = match &self.secondary {
            None => true,
            Some(key) => tokens.secondary == Some(key.as_str()),
        };
        primary_ok && secondary_ok
    }
}

/// The result of filtering a directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "files", rename_all = "camelCase")]
pub enum FilterOutcome {
    /// Nothing matched; downstream actions should be disabled.
    NoMatch,
    /// The matching file names in listing order. Never empty.
    Matches(Vec<String>),
}

impl FilterOutcome {
    pub fn files(&self) -> &[String] {
        match self {
            FilterOutcome::NoMatch => &[],
            FilterOutcome::Matches(files) => files,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, FilterOutcome::Matches(_))
    }
}

/// Filters file names by the selection, preserving their input order.
pub fn filter_files<S: AsRef<str>>(file_names: &[S], selection: &FilterSelection) -> FilterOutcome {
    let matched: Vec<String> = file_names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| selection.matches(name))
        .map(str::to_string)
        .collect();

    if matched.is_empty() {
        FilterOutcome::NoMatch
    } else {
        FilterOutcome::Matches(matched)
    }
}

/// One entry of the target picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetChoice {
    /// Every currently filtered file. This is never a file name.
    AllFiltered { count: usize },
    File { name: String },
}

impl TargetChoice {
    pub fn is_batch(&self) -> bool {
        matches!(self, TargetChoice::AllFiltered { .. })
    }
}

/// Builds the candidate list for the target picker.
///
/// With `batch_capable` set, a synthetic "all filtered files" entry is
/// prepended whenever at least one file matched.
pub fn target_choices(outcome: &FilterOutcome, batch_capable: bool) -> Vec<TargetChoice> {
    let files = outcome.files();
    let batch = (batch_capable && !files.is_empty()).then(|| TargetChoice::AllFiltered {
        count: files.len(),
    });
    batch
        .into_iter()
        .chain(files.iter().map(|name| TargetChoice::File { name: name.clone() }))
        .collect()
}

/// Resolves a choice to the real file names it stands for.
///
/// A single-file choice that is no longer part of the filtered list resolves
/// to nothing.
pub fn resolve_targets(choice: &TargetChoice, outcome: &FilterOutcome) -> Vec<String> {
    match choice {
        TargetChoice::AllFiltered { .. } => outcome.files().to_vec(),
        TargetChoice::File { name } => outcome
            .files()
            .iter()
            .filter(|candidate| *candidate == name)
            .cloned()
            .collect(),
    }
}
