//! Defines the central, mutable state of the application.

use crate::config::{settings, AppConfig};
use crate::core::tokens::target_choices;
use crate::core::{BatchReport, CoreError, FilterOutcome, FilterSelection, Session, TargetChoice};
use std::path::{Path, PathBuf};

/// Holds the complete, mutable state of the application.
///
/// Wrapped in an `Arc<Mutex<...>>` so the IPC handler and the event loop can
/// both reach it. Only one command runs at a time.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Where the configuration is persisted; `None` uses the platform default.
    pub config_dir: Option<PathBuf>,
    /// The currently opened folder, if any.
    pub session: Option<Session>,
    /// The current primary/secondary filter keys.
    pub selection: FilterSelection,
    /// Secondary tokens for the current primary key.
    pub secondary_tokens: Vec<String>,
    /// The files matching `selection` in the current session.
    pub filter_outcome: FilterOutcome,
    /// The target picked in the update tab.
    pub target: Option<TargetChoice>,
    /// A one-line message for the status bar.
    pub status_message: String,
    /// Results of the most recent update.
    pub last_report: Option<BatchReport>,
}

impl Default for AppState {
    /// Creates a default `AppState` instance, loading the configuration from disk.
    fn default() -> Self {
        Self::new(AppConfig::load().unwrap_or_default(), None)
    }
}

impl AppState {
    pub fn new(config: AppConfig, config_dir: Option<PathBuf>) -> Self {
        Self {
            config,
            config_dir,
            session: None,
            selection: FilterSelection::default(),
            secondary_tokens: vec![String::new()],
            filter_outcome: FilterOutcome::NoMatch,
            target: None,
            status_message: "Ready.".to_string(),
            last_report: None,
        }
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.session.as_ref().map(Session::folder)
    }

    /// Opens `folder` as a new session.
    ///
    /// On failure the previous session and selection are kept untouched.
    pub fn open_folder(&mut self, folder: PathBuf) -> Result<(), CoreError> {
        let session = Session::open(folder, self.config.preview_line_limit)?;
        tracing::info!("Switched folder to {:?}", session.folder());
        self.status_message = format!(
            "Loaded {} release notes from {}",
            session.files().len(),
            session.folder().display()
        );
        self.config.last_folder = Some(session.folder().to_path_buf());
        self.session = Some(session);
        self.selection = FilterSelection::default();
        self.target = None;
        self.last_report = None;
        self.recompute_filters();
        self.persist_config();
        Ok(())
    }

    /// Replaces the session with a fresh scan of the same folder.
    pub fn rescan(&mut self) -> Result<(), CoreError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        self.session = Some(session.rescan()?);
        self.recompute_filters();
        Ok(())
    }

    /// Drops the session and forgets the last folder.
    pub fn clear_folder(&mut self) {
        self.session = None;
        self.selection = FilterSelection::default();
        self.target = None;
        self.last_report = None;
        self.config.last_folder = None;
        self.recompute_filters();
        self.status_message = "Ready.".to_string();
        self.persist_config();
    }

    /// Applies new filter keys. Changing the primary key clears the secondary
    /// key, since its choices are rebuilt for the new primary.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        let mut selection = selection;
        if selection.primary != self.selection.primary {
            selection.secondary = None;
        }
        self.selection = selection;
        self.target = None;
        self.recompute_filters();
    }

    /// Re-derives secondary tokens, the filter outcome and the target.
    ///
    /// A target that is still a candidate is kept; otherwise the first
    /// candidate (the batch entry when enabled) is chosen.
    pub fn recompute_filters(&mut self) {
        let Some(session) = &self.session else {
            self.secondary_tokens = vec![String::new()];
            self.filter_outcome = FilterOutcome::NoMatch;
            self.target = None;
            return;
        };

        self.secondary_tokens = session.secondary_tokens(self.selection.primary_key());
        self.filter_outcome = session.filter(&self.selection);
        let choices = self.target_choices();
        let keep = self.target.as_ref().and_then(|current| {
            choices.iter().find(|c| same_target(c, current)).cloned()
        });
        self.target = keep.or_else(|| choices.into_iter().next());
    }

    pub fn target_choices(&self) -> Vec<TargetChoice> {
        target_choices(&self.filter_outcome, self.config.batch_mode_enabled)
    }

    /// Selects a target by its UI id (`"all"` or a file name).
    pub fn select_target(&mut self, id: &str) -> bool {
        let found = self
            .target_choices()
            .into_iter()
            .find(|choice| target_id(choice) == id);
        match found {
            Some(choice) => {
                self.target = Some(choice);
                true
            }
            None => false,
        }
    }

    pub fn persist_config(&self) {
        if let Err(e) = settings::save_config(&self.config, self.config_dir.as_deref()) {
            tracing::error!("Failed to save config: {}", e);
        }
    }
}

pub const BATCH_TARGET_ID: &str = "all";

/// The stable id the UI uses for a target choice.
pub fn target_id(choice: &TargetChoice) -> &str {
    match choice {
        TargetChoice::AllFiltered { .. } => BATCH_TARGET_ID,
        TargetChoice::File { name } => name,
    }
}

fn same_target(a: &TargetChoice, b: &TargetChoice) -> bool {
    target_id(a) == target_id(b)
}
