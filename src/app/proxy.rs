//! Decouples command handlers from the concrete event loop.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// Anything that can deliver a `UserEvent` to the UI.
///
/// Delivery is fire-and-forget; tests swap in a channel-backed proxy.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // A closed event loop only happens during shutdown.
        if let Err(e) = EventLoopProxy::send_event(self, event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
