use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::action::IpKeyAction;
use crate::domain::model::KeySettings;

/// Events delivered by the host for one key instance. Each carries the
/// settings record the host currently holds for the key.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Appear(KeySettings),
    PressStart(KeySettings),
    PressEnd(KeySettings),
}

/// Runtime that drains host events serially into the action. One channel,
/// one task: events for a key instance are never processed concurrently.
pub struct ActionRuntime;

impl ActionRuntime {
    pub fn spawn(mut action: IpKeyAction) -> (mpsc::UnboundedSender<HostEvent>, JoinHandle<()>) {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                match event {
                    HostEvent::Appear(settings) => action.on_appear(settings).await,
                    HostEvent::PressStart(settings) => action.on_press(settings).await,
                    HostEvent::PressEnd(settings) => action.on_release(settings).await,
                }
            }
            tracing::debug!("Host event channel closed, action runtime stopped");
        });

        (event_tx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::shared_settings;
    use crate::application::testing::{RecordingSink, StubFetcher};
    use crate::infrastructure::config::ActionConfig;

    #[tokio::test(start_paused = true)]
    async fn test_runtime_drives_a_full_gesture() {
        let sink = Arc::new(RecordingSink::default());
        let fetcher = Arc::new(StubFetcher::ok("203.0.113.42"));
        let settings = shared_settings(KeySettings::default());
        let action = IpKeyAction::new(
            settings.clone(),
            sink.clone(),
            fetcher.clone(),
            ActionConfig::default(),
        );
        let (event_tx, handle) = ActionRuntime::spawn(action);

        let record = KeySettings {
            hold_threshold_seconds: Some(0.5),
            ..Default::default()
        };
        event_tx.send(HostEvent::Appear(record.clone())).unwrap();
        event_tx.send(HostEvent::PressStart(record.clone())).unwrap();
        event_tx.send(HostEvent::PressEnd(record)).unwrap();
        drop(event_tx);
        handle.await.unwrap();

        // Press and release arrive back to back: a tap, no side effects
        assert_eq!(sink.url_opens(), 0);
        assert!(sink.displayed().contains(&"Asking...".to_string()));

        // The debounced refresh still completes afterwards
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(
            settings.read().await.cached_value.as_deref(),
            Some("203.\n0.\n113.\n42")
        );
    }
}
