use std::sync::Arc;

use crate::domain::model::KeySettings;

/// Outbound boundary to the host that owns the key. Every call is
/// fire-and-forget: the action never consumes a return value, and a host
/// that drops a call must not break the gesture lifecycle.
pub trait HostSink: Send + Sync {
    /// Render text on the key
    fn set_display_text(&self, text: &str);

    /// Flash the success indicator on the key
    fn show_success(&self);

    /// Rewrite the persisted settings record as a whole
    fn persist_settings(&self, settings: &KeySettings);

    /// Open an external URL on the host machine
    fn open_url(&self, url: &str);
}

/// Shared sink handle for cloning into background tasks
pub type HostSinkHandle = Arc<dyn HostSink>;
