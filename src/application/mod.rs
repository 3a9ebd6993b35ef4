pub mod action;
pub mod processor;
pub mod refresh;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::model::KeySettings;

/// Settings shared between the gesture handlers and the in-flight refresh
/// task. Each writer rewrites the record as a whole (last writer wins per
/// press/release cycle).
pub type SharedSettings = Arc<RwLock<KeySettings>>;

pub fn shared_settings(initial: KeySettings) -> SharedSettings {
    Arc::new(RwLock::new(initial))
}
