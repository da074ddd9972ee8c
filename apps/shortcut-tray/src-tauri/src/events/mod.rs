//! Event bus for decoupled communication between the registry and the UI.
//!
//! The registry and the runner emit events without knowing who consumes
//! them. The handlers started here rebuild the tray menu, show failure
//! windows, and forward everything to open dialogs.
//!
//! # Example
//!
//! ```rust,ignore
//! event_bus.emit(AppEvent::ShortcutsChanged {
//!     change: ShortcutChange::Added,
//!     name: "Lock".to_string(),
//! });
//!
//! // The tray handler rebuilds the menu
//! // The frontend handler tells the "Edit Shortcuts" dialog to reload
//! ```

pub mod handlers;
pub mod types;

pub use types::{AppEvent, ShortcutChange};

use std::sync::Arc;
use tauri::AppHandle;
use tokio::sync::broadcast;

/// Capacity of the event channel.
/// Events beyond this will cause receivers to lag.
const CHANNEL_CAPACITY: usize = 256;

/// The central event bus for application-wide event distribution.
///
/// Uses a broadcast channel so every subscriber sees every event.
/// Emitting never blocks.
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Emit an event to all subscribers.
    ///
    /// This is non-blocking and will not fail even if there are no subscribers.
    pub fn emit(&self, event: AppEvent) {
        tracing::trace!(
            name = event.shortcut_name(),
            run_id = ?event.run_id(),
            "Event emitted: {}",
            event.description()
        );
        // Ignore send errors - it's fine if no one is listening
        let _ = self.sender.send(event);
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Start all event handlers.
///
/// Called once during app setup. Each handler runs in its own async task.
pub fn start_event_handlers(app_handle: AppHandle, event_bus: &Arc<EventBus>) {
    tracing::info!("Starting event handlers...");

    handlers::tray::start_handler(app_handle.clone(), event_bus.subscribe());
    handlers::notifier::start_handler(app_handle.clone(), event_bus.subscribe());
    handlers::frontend::start_handler(app_handle, event_bus.subscribe());

    tracing::info!(subscribers = event_bus.subscriber_count(), "Event handlers started");
}
