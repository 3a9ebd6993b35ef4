use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::SharedSettings;
use crate::domain::host::HostSinkHandle;
use crate::domain::model::format_dotted;
use crate::infrastructure::net::IpFetcherHandle;

/// Delayed refresh of the cached external value with last-call-wins
/// coalescing: at most one fetch fires per debounce window, and a new
/// `schedule` supersedes any pending one.
pub struct DebouncedRefresher {
    fetcher: IpFetcherHandle,
    sink: HostSinkHandle,
    settings: SharedSettings,
    generation: Arc<AtomicU64>,
}

impl DebouncedRefresher {
    pub fn new(fetcher: IpFetcherHandle, sink: HostSinkHandle, settings: SharedSettings) -> Self {
        Self {
            fetcher,
            sink,
            settings,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arm (or re-arm) the pending refresh. The delayed task fires only if
    /// its generation is still current when the delay elapses.
    pub fn schedule(&self, delay: Duration) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.generation.clone();
        let fetcher = self.fetcher.clone();
        let sink = self.sink.clone();
        let settings = self.settings.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Superseded by a later schedule while we slept
            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            match fetcher.fetch().await {
                Ok(raw) => {
                    let formatted = format_dotted(&raw);
                    let mut guard = settings.write().await;
                    guard.cached_value = Some(formatted.clone());
                    sink.set_display_text(&formatted);
                    sink.persist_settings(&guard);
                    tracing::debug!("Refreshed cached value: {}", raw);
                }
                Err(e) => {
                    // Previous displayed/cached value stays in place
                    tracing::warn!("Value refresh failed: {}", e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{RecordingSink, SinkCall, StubFetcher};
    use crate::application::{shared_settings, SharedSettings};
    use crate::domain::model::KeySettings;

    const DELAY: Duration = Duration::from_millis(500);

    fn make_refresher(
        fetcher: &Arc<StubFetcher>,
        sink: &Arc<RecordingSink>,
        settings: &SharedSettings,
    ) -> DebouncedRefresher {
        DebouncedRefresher::new(fetcher.clone(), sink.clone(), settings.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_schedules_coalesce_into_one_fetch() {
        let fetcher = Arc::new(StubFetcher::ok("203.0.113.42"));
        let sink = Arc::new(RecordingSink::default());
        let settings = shared_settings(KeySettings::default());
        let refresher = make_refresher(&fetcher, &sink, &settings);

        refresher.schedule(DELAY);
        refresher.schedule(DELAY);
        refresher.schedule(DELAY);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearms_after_firing() {
        let fetcher = Arc::new(StubFetcher::ok("203.0.113.42"));
        let sink = Arc::new(RecordingSink::default());
        let settings = shared_settings(KeySettings::default());
        let refresher = make_refresher(&fetcher, &sink, &settings);

        refresher.schedule(DELAY);
        tokio::time::sleep(Duration::from_secs(1)).await;
        refresher.schedule(DELAY);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(fetcher.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_fetch_formats_displays_and_persists() {
        let fetcher = Arc::new(StubFetcher::ok("203.0.113.42"));
        let sink = Arc::new(RecordingSink::default());
        let settings = shared_settings(KeySettings::default());
        let refresher = make_refresher(&fetcher, &sink, &settings);

        refresher.schedule(DELAY);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let expected = "203.\n0.\n113.\n42";
        assert_eq!(
            settings.read().await.cached_value.as_deref(),
            Some(expected)
        );
        assert_eq!(sink.displayed(), vec![expected.to_string()]);
        assert_eq!(
            sink.last_persisted().unwrap().cached_value.as_deref(),
            Some(expected)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_keeps_previous_value() {
        let fetcher = Arc::new(StubFetcher::failing());
        let sink = Arc::new(RecordingSink::default());
        let settings = shared_settings(KeySettings {
            cached_value: Some("198.\n51.\n100.\n7".to_string()),
            ..Default::default()
        });
        let refresher = make_refresher(&fetcher, &sink, &settings);

        refresher.schedule(DELAY);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(
            settings.read().await.cached_value.as_deref(),
            Some("198.\n51.\n100.\n7")
        );
        // No display update and no persist on failure
        assert!(sink.calls().iter().all(|c| !matches!(
            c,
            SinkCall::Display(_) | SinkCall::Persist(_)
        )));
    }
}
