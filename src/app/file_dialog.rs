//! An abstraction layer for native dialogs to enable testing.

use crate::core::VersionStamp;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

/// Defines a common interface for the dialogs the shell needs.
/// Tests use a mock so no OS window is ever shown.
pub trait DialogService: Send + Sync {
    /// Opens a dialog to select a single directory.
    fn pick_directory(&self) -> Option<PathBuf>;

    /// Asks the user to confirm a destructive update across several files.
    fn confirm_batch_update(&self, file_count: usize, stamp: &VersionStamp) -> bool;
}

/// The production implementation that uses the `rfd` crate to show native OS dialogs.
pub struct NativeDialogService;

impl DialogService for NativeDialogService {
    fn pick_directory(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select release note folder")
            .pick_folder()
    }

    fn confirm_batch_update(&self, file_count: usize, stamp: &VersionStamp) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Confirm batch update")
            .set_description(format!(
                "You are about to modify {file_count} files at once.\n\n\
                 Everything except lines starting with # will be replaced.\n\
                 Version: {stamp}\n\nContinue?"
            ))
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(answer, MessageDialogResult::Yes)
    }
}
