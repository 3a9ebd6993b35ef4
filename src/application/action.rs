use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

use crate::application::refresh::DebouncedRefresher;
use crate::application::SharedSettings;
use crate::domain::host::HostSinkHandle;
use crate::domain::model::KeySettings;
use crate::infrastructure::config::ActionConfig;
use crate::infrastructure::net::IpFetcherHandle;

/// The key action itself: a two-state gesture machine (idle or pressed).
///
/// A press records the monotonic press instant, shows the in-progress text
/// and arms the debounced refresh. The matching release classifies the
/// gesture against the configured hold threshold and always leaves the
/// press state cleared, whatever else happens around it.
pub struct IpKeyAction {
    settings: SharedSettings,
    sink: HostSinkHandle,
    refresher: DebouncedRefresher,
    config: ActionConfig,
    pressed_at: Option<Instant>,
}

impl IpKeyAction {
    pub fn new(
        settings: SharedSettings,
        sink: HostSinkHandle,
        fetcher: IpFetcherHandle,
        config: ActionConfig,
    ) -> Self {
        let refresher = DebouncedRefresher::new(fetcher, sink.clone(), settings.clone());
        Self {
            settings,
            sink,
            refresher,
            config,
            pressed_at: None,
        }
    }

    /// The key became visible: show whatever value we last fetched.
    pub async fn on_appear(&mut self, incoming: KeySettings) {
        let mut settings = self.settings.write().await;
        *settings = sanitized(incoming);

        if let Some(cached) = &settings.cached_value {
            self.sink.set_display_text(cached);
        }
        self.sink.persist_settings(&settings);
    }

    /// Press: start the gesture timer and arm the debounced refresh.
    pub async fn on_press(&mut self, incoming: KeySettings) {
        self.pressed_at = Some(Instant::now());

        {
            let mut settings = self.settings.write().await;
            *settings = sanitized(incoming);
            settings.press_started_at = Some(unix_millis());

            self.sink.set_display_text(&self.config.in_progress_text);
            self.sink.persist_settings(&settings);
        }

        self.refresher.schedule(self.config.debounce_delay());
    }

    /// Release: classify tap vs hold, then clear the press state on every
    /// path so nothing leaks into the next gesture.
    pub async fn on_release(&mut self, incoming: KeySettings) {
        // An absent instant (e.g. the process restarted mid-gesture) degrades
        // to a zero duration instead of failing.
        let duration = self
            .pressed_at
            .take()
            .map(|pressed| pressed.elapsed())
            .unwrap_or(Duration::ZERO);

        let mut settings = self.settings.write().await;
        *settings = sanitized(incoming);

        match settings.hold_threshold() {
            Some(threshold) => {
                // Source formula: strictly greater after subtracting the
                // jitter buffer, so the exact boundary stays a tap.
                if duration.saturating_sub(self.config.release_buffer()) > threshold {
                    tracing::info!(
                        "Hold gesture after {:?}, opening {}",
                        duration,
                        self.config.details_url
                    );
                    self.sink.open_url(&self.config.details_url);
                    self.sink.show_success();
                } else {
                    tracing::debug!("Tap gesture after {:?}", duration);
                }
            }
            None => {
                tracing::debug!("No hold threshold configured, skipping classification");
            }
        }

        settings.press_started_at = None;
        self.sink.persist_settings(&settings);
    }
}

fn sanitized(mut settings: KeySettings) -> KeySettings {
    settings.sanitize();
    settings
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
