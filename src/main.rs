use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use ipkey::adapter::ConsoleHost;
use ipkey::application::action::IpKeyAction;
use ipkey::application::processor::{ActionRuntime, HostEvent};
use ipkey::application::{shared_settings, SharedSettings};
use ipkey::domain::host::HostSinkHandle;
use ipkey::domain::model::KeySettings;
use ipkey::infrastructure::net::{HttpIpFetcher, IpFetcherHandle};
use ipkey::infrastructure::{config, logging};

/// One stdin line in host wire form: {"event":"pressStart","settings":{...}}
#[derive(Debug, Deserialize)]
struct WireEvent {
    event: String,
    settings: Option<KeySettings>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::setup(false);
    config::init();
    let app_config = config::app();

    let host = ConsoleHost::new();
    let persisted = host.load_settings();

    let sink: HostSinkHandle = Arc::new(host);
    let fetcher: IpFetcherHandle = Arc::new(HttpIpFetcher::new(&app_config.fetcher));
    let settings = shared_settings(persisted.clone());

    let action = IpKeyAction::new(settings.clone(), sink, fetcher, app_config.action.clone());
    let (event_tx, runtime) = ActionRuntime::spawn(action);

    // The key becomes visible as soon as the simulator starts
    event_tx.send(HostEvent::Appear(persisted))?;

    println!("ipkey host simulator - appear | press | release (or JSON lines), Ctrl-D quits");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line, &settings).await {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Ignoring input {:?}: {}", line, e);
            }
        }
    }

    drop(event_tx);
    runtime.await?;
    Ok(())
}

async fn parse_line(line: &str, settings: &SharedSettings) -> Result<HostEvent> {
    let (name, incoming) = if line.starts_with('{') {
        let wire: WireEvent = serde_json::from_str(line)?;
        (wire.event, wire.settings)
    } else {
        (line.to_string(), None)
    };

    // A bare keyword reuses the record the action currently holds
    let record = match incoming {
        Some(record) => record,
        None => settings.read().await.clone(),
    };

    match name.as_str() {
        "appear" | "onAppear" => Ok(HostEvent::Appear(record)),
        "press" | "pressStart" | "onPressStart" => Ok(HostEvent::PressStart(record)),
        "release" | "pressEnd" | "onPressEnd" => Ok(HostEvent::PressEnd(record)),
        other => anyhow::bail!("unknown event {:?}", other),
    }
}
