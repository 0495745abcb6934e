//! Shared plumbing for the command handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

/// Locks the state, recovering the guard if a previous holder panicked.
pub fn lock_state(state: &Arc<Mutex<AppState>>) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("AppState mutex was poisoned; continuing with inner state");
        poisoned.into_inner()
    })
}

/// Sends a fresh `StateUpdate` built from `state`.
pub fn notify_state<P: EventProxy>(state: &AppState, proxy: &P) {
    let ui_state = generate_ui_state(state);
    proxy.send_event(UserEvent::StateUpdate(Box::new(ui_state)));
}

/// Locks the `AppState`, performs a mutation, then sends a `StateUpdate`.
pub fn with_state_and_notify<F, R, P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    update_fn: F,
) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    let mut state_guard = lock_state(state);
    let result = update_fn(&mut state_guard);
    notify_state(&state_guard, proxy);
    result
}
