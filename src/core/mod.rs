pub mod error;
pub mod release_note;
pub mod scanner;
pub mod session;
pub mod tokens;
pub mod updater;

use chrono::{DateTime, Local};
use serde::Serialize;

/// One release note as seen by a directory scan. Recomputed on every scan.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub display_name: String,
    pub body: BodyPreview,
    pub modified: Option<DateTime<Local>>,
}

/// The listing preview of a file, or why it could not be produced.
///
/// An empty file and an unreadable one are different states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BodyPreview {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        header_lines: usize,
        current_version: Option<String>,
    },
    Unreadable { reason: String },
}

pub use error::{CoreError, ValidationError};
pub use release_note::{Environment, Stage, VersionStamp};
pub use session::Session;
pub use tokens::{FilterOutcome, FilterSelection, TargetChoice};
pub use updater::{update_batch, update_one, BatchReport, ReleaseUpdate, UpdateResult};
