//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module is the presentation layer: it flattens the session, filter and
//! target state into plain serializable values the webview renders as-is.

use serde::Serialize;

use super::state::{target_id, AppState};
use crate::core::{scanner, BatchReport, BodyPreview, FileEntry, Session, TargetChoice};

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub current_folder: String,
    pub files: Vec<FileRow>,
    pub primary_tokens: Vec<String>,
    pub secondary_tokens: Vec<String>,
    pub selected_primary: String,
    pub selected_secondary: String,
    pub targets: Vec<TargetOption>,
    pub selected_target: Option<String>,
    pub has_matches: bool,
    pub can_submit: bool,
    pub batch_mode_enabled: bool,
    pub status_message: String,
    pub last_report: Option<BatchReport>,
}

/// One row of the folder listing.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FileRow {
    pub name: String,
    pub display_name: String,
    pub body: BodyPreview,
    pub modified: Option<String>,
}

/// One option of the target picker.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TargetOption {
    pub id: String,
    pub label: String,
    pub is_batch: bool,
}

/// What the update tab shows for the current target.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilePreview {
    Empty,
    File { name: String, content: String },
    Unreadable { name: String, reason: String },
    Batch { files: Vec<String> },
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let session = state.session.as_ref();
    let files = session
        .map(|s| s.files().iter().map(file_row).collect())
        .unwrap_or_default();
    let primary_tokens = session
        .map(|s| s.primary_tokens().to_vec())
        .unwrap_or_else(|| vec![String::new()]);

    let targets: Vec<TargetOption> = state.target_choices().iter().map(target_option).collect();
    let has_matches = state.filter_outcome.is_match();

    UiState {
        current_folder: state
            .current_folder()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        files,
        primary_tokens,
        secondary_tokens: state.secondary_tokens.clone(),
        selected_primary: state.selection.primary_key().to_string(),
        selected_secondary: state.selection.secondary_key().to_string(),
        targets,
        selected_target: state.target.as_ref().map(|t| target_id(t).to_string()),
        has_matches,
        can_submit: session.is_some() && has_matches && state.target.is_some(),
        batch_mode_enabled: state.config.batch_mode_enabled,
        status_message: state.status_message.clone(),
        last_report: state.last_report.clone(),
    }
}

fn file_row(entry: &FileEntry) -> FileRow {
    FileRow {
        name: entry.name.clone(),
        display_name: entry.display_name.clone(),
        body: entry.body.clone(),
        modified: entry
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string()),
    }
}

fn target_option(choice: &TargetChoice) -> TargetOption {
    let label = match choice {
        TargetChoice::AllFiltered { count } => {
            format!("=== Update all {count} filtered files ===")
        }
        TargetChoice::File { name } => name.clone(),
    };
    TargetOption {
        id: target_id(choice).to_string(),
        label,
        is_batch: choice.is_batch(),
    }
}

/// Builds the preview for the current target.
pub fn build_preview(state: &AppState) -> FilePreview {
    match (state.session.as_ref(), state.target.as_ref()) {
        (Some(_), Some(TargetChoice::AllFiltered { .. })) => FilePreview::Batch {
            files: state.filter_outcome.files().to_vec(),
        },
        (Some(session), Some(TargetChoice::File { name })) => preview_single(session, name),
        _ => FilePreview::Empty,
    }
}

fn preview_single(session: &Session, name: &str) -> FilePreview {
    match scanner::read_full(&session.path_of(name)) {
        Ok(content) => FilePreview::File {
            name: name.to_string(),
            content,
        },
        Err(e) => FilePreview::Unreadable {
            name: name.to_string(),
            reason: e.to_string(),
        },
    }
}
