//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! Handlers run synchronously to completion: they mutate the `AppState`, call
//! into `core`, and send `UserEvent`s back to the UI.

use super::events::UserEvent;
use super::file_dialog::DialogService;
use super::helpers::{lock_state, notify_state, with_state_and_notify};
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::build_preview;
use crate::core::tokens::resolve_targets;
use crate::core::{Environment, FilterSelection, ReleaseUpdate, Stage, VersionStamp};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Payload of `updateFilters`.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct FilterPayload {
    pub primary: String,
    pub secondary: String,
}

/// Payload of `submitUpdate`.
#[derive(Deserialize, Debug)]
pub struct UpdatePayload {
    pub stage: Stage,
    pub sequence: String,
    pub environment: Environment,
    pub body: String,
}

/// Handles the initial request for state from the frontend when it loads.
///
/// Reopens the last folder when the config asks for it and it still exists.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = lock_state(&state);
    if state_guard.session.is_none() && state_guard.config.auto_load_last_folder {
        if let Some(folder) = state_guard.config.last_folder.clone() {
            match state_guard.open_folder(folder) {
                Ok(()) => tracing::info!("Restored last folder on startup"),
                Err(e) => tracing::warn!("Could not restore last folder: {}", e),
            }
        }
    }
    notify_state(&state_guard, &proxy);
    proxy.send_event(UserEvent::ShowFilePreview(build_preview(&state_guard)));
}

/// Opens a native dialog for the user to select a folder.
pub fn select_directory<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match dialog.pick_directory() {
        Some(path) => open_directory(path, proxy, state),
        None => tracing::info!("User cancelled folder selection."),
    }
}

/// Opens a folder typed or pasted by the user.
pub fn open_path<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match serde_json::from_value::<String>(payload.clone()) {
        Ok(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return;
            }
            open_directory(PathBuf::from(raw), proxy, state);
        }
        Err(_) => tracing::warn!(
            "Failed to deserialize path string from payload: {:?}",
            payload
        ),
    }
}

/// Replaces the session with `path`, or reports why it cannot be opened.
///
/// An invalid path leaves the previous folder and filters in place.
pub fn open_directory<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = lock_state(&state);
    match state_guard.open_folder(path) {
        Ok(()) => {
            notify_state(&state_guard, &proxy);
            proxy.send_event(UserEvent::ShowFilePreview(build_preview(&state_guard)));
        }
        Err(e) => {
            tracing::warn!("Rejected folder: {}", e);
            proxy.send_event(UserEvent::ShowError(e.to_string()));
            notify_state(&state_guard, &proxy);
        }
    }
}

/// Re-reads the current folder from disk.
pub fn rescan_directory<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let result = with_state_and_notify(&state, &proxy, |s| s.rescan());
    if let Err(e) = result {
        proxy.send_event(UserEvent::ShowError(e.to_string()));
    }
}

/// Closes the current folder and forgets it.
pub fn clear_directory<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| s.clear_folder());
    proxy.send_event(UserEvent::ShowFilePreview(build_preview(&lock_state(&state))));
}

/// Applies new filter keys.
///
/// The folder is re-read first so the filter always runs on the current
/// directory contents.
pub fn update_filters<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(filters) = serde_json::from_value::<FilterPayload>(payload.clone()) else {
        tracing::warn!("Failed to deserialize filters from payload: {:?}", payload);
        return;
    };

    let mut state_guard = lock_state(&state);
    if let Err(e) = state_guard.rescan() {
        proxy.send_event(UserEvent::ShowError(e.to_string()));
    }
    state_guard.set_selection(FilterSelection::new(&filters.primary, &filters.secondary));
    notify_state(&state_guard, &proxy);
    proxy.send_event(UserEvent::ShowFilePreview(build_preview(&state_guard)));
}

/// Picks the update target by its UI id and previews it.
pub fn select_target<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(id) = serde_json::from_value::<String>(payload.clone()) else {
        tracing::warn!("Failed to deserialize target id from payload: {:?}", payload);
        return;
    };

    let mut state_guard = lock_state(&state);
    if !state_guard.select_target(&id) {
        tracing::warn!("Ignoring unknown target {:?}", id);
    }
    notify_state(&state_guard, &proxy);
    proxy.send_event(UserEvent::ShowFilePreview(build_preview(&state_guard)));
}

/// Validates and applies an update to the current target.
///
/// Batch targets need confirmation through the dialog service. Each file is
/// processed independently and every outcome is reported back.
pub fn submit_update<P: EventProxy, D: DialogService + ?Sized>(
    payload: serde_json::Value,
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let request = match serde_json::from_value::<UpdatePayload>(payload.clone()) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Failed to deserialize update request {:?}: {}", payload, e);
            proxy.send_event(UserEvent::ShowError(
                "The update request was incomplete.".to_string(),
            ));
            return;
        }
    };

    let (update, paths, is_batch) = {
        let state_guard = lock_state(&state);
        let Some(session) = state_guard.session.as_ref() else {
            proxy.send_event(UserEvent::ShowError("Select a folder first.".to_string()));
            return;
        };
        let targets = state_guard
            .target
            .as_ref()
            .map(|choice| resolve_targets(choice, &state_guard.filter_outcome))
            .unwrap_or_default();
        if targets.is_empty() {
            proxy.send_event(UserEvent::ShowError(
                "Select a valid target file.".to_string(),
            ));
            return;
        }

        let stamp = VersionStamp::new(request.stage, request.sequence, request.environment);
        let update = match ReleaseUpdate::new(&stamp, &request.body) {
            Ok(update) => update,
            Err(e) => {
                proxy.send_event(UserEvent::ShowError(e.to_string()));
                return;
            }
        };
        let paths: Vec<PathBuf> = targets.iter().map(|name| session.path_of(name)).collect();
        let is_batch = state_guard.target.as_ref().is_some_and(|t| t.is_batch());
        (update, paths, is_batch)
    };

    if is_batch && !dialog.confirm_batch_update(paths.len(), update.stamp()) {
        tracing::info!("Batch update of {} files cancelled by user", paths.len());
        with_state_and_notify(&state, &proxy, |s| {
            s.status_message = "Batch update cancelled.".to_string();
        });
        return;
    }

    let report = update.apply_all(&paths);
    tracing::info!(
        "Update {} finished: {} succeeded, {} failed",
        report.stamp,
        report.succeeded(),
        report.failed()
    );

    let mut state_guard = lock_state(&state);
    state_guard.status_message = format!(
        "{}: {} updated, {} failed",
        report.stamp,
        report.succeeded(),
        report.failed()
    );
    state_guard.last_report = Some(report.clone());
    if let Err(e) = state_guard.rescan() {
        proxy.send_event(UserEvent::ShowError(e.to_string()));
    }
    notify_state(&state_guard, &proxy);
    proxy.send_event(UserEvent::UpdateFinished(report));
    proxy.send_event(UserEvent::ShowFilePreview(build_preview(&state_guard)));
}

/// Reveals the current folder in the platform file manager.
pub fn open_folder<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let folder = lock_state(&state).current_folder().map(|p| p.to_path_buf());
    let Some(folder) = folder else {
        proxy.send_event(UserEvent::ShowError("Select a folder first.".to_string()));
        return;
    };
    if let Err(e) = open::that(&folder) {
        tracing::warn!("Failed to open {:?}: {}", folder, e);
        proxy.send_event(UserEvent::ShowError(format!(
            "Could not open {}: {}",
            folder.display(),
            e
        )));
    }
}
