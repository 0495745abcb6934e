//! The event-handling shell between the webview and the core.

pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod view_model;

use std::sync::{Arc, Mutex};

use events::{IpcMessage, UserEvent};
use file_dialog::DialogService;
use proxy::EventProxy;
use state::AppState;

/// Parses an IPC message from the webview and runs the matching command.
pub fn handle_ipc_message<P: EventProxy, D: DialogService + ?Sized>(
    message: String,
    dialog: Arc<D>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg: IpcMessage = match serde_json::from_str(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Failed to parse IPC message {:?}: {}", message, e);
            return;
        }
    };
    tracing::debug!("IPC command: {}", msg.command);

    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "selectDirectory" => commands::select_directory(dialog.as_ref(), proxy, state),
        "openPath" => commands::open_path(msg.payload, proxy, state),
        "rescanDirectory" => commands::rescan_directory(proxy, state),
        "clearDirectory" => commands::clear_directory(proxy, state),
        "updateFilters" => commands::update_filters(msg.payload, proxy, state),
        "selectTarget" => commands::select_target(msg.payload, proxy, state),
        "submitUpdate" => commands::submit_update(msg.payload, dialog.as_ref(), proxy, state),
        "openFolder" => commands::open_folder(proxy, state),
        unknown => tracing::warn!("Received unknown IPC command: {}", unknown),
    }
}

/// Forwards a `UserEvent` to the frontend by calling its `window.*` hook.
pub fn handle_user_event(event: UserEvent, webview: &wry::WebView) {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => to_script("render", &*ui_state),
        UserEvent::ShowFilePreview(preview) => to_script("showPreview", &preview),
        UserEvent::ShowError(message) => to_script("showError", &message),
        UserEvent::UpdateFinished(report) => to_script("updateFinished", &report),
        UserEvent::DragStateChanged(active) => to_script("setDragState", &active),
    };

    let Some(script) = script else { return };
    if let Err(e) = webview.evaluate_script(&script) {
        tracing::error!("Failed to evaluate script in webview: {}", e);
    }
}

fn to_script<T: serde::Serialize + ?Sized>(function: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(format!("window.{function}({json});")),
        Err(e) => {
            tracing::error!("Failed to serialize payload for {}: {}", function, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_script_embeds_json_payload() {
        assert_eq!(
            to_script("showError", "say \"hi\"").as_deref(),
            Some(r#"window.showError("say \"hi\"");"#)
        );
        assert_eq!(
            to_script("setDragState", &true).as_deref(),
            Some("window.setDragState(true);")
        );
    }
}
