//! Console front-end for `rtpm`.
//!
//! Wires together the background tasks feeding one event loop:
//! - Hub observer          → `Message::Tick`
//! - Config file watcher   → `Message::ConfigReloaded`
//! - Ctrl-C                → `Message::Shutdown`

pub mod console;

pub use console::Console;

use rtpm_config::{default_path, load_with_env, ConfigWatcher, RtpmConfig, SourceConfig};
use rtpm_core::{Message, Result};
use rtpm_hub::Hub;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Run the dashboard until Ctrl-C.
pub async fn run() -> Result<()> {
    let path = default_path();
    let mut config = load_with_env(&path)?;
    if config.source.is_simulated() {
        info!("no metrics endpoint configured; using the simulator");
    } else {
        info!(endpoint = %config.source.endpoint, "polling metrics endpoint");
    }

    let hub = Hub::from_config(&config)?;
    let mut console = Console::stdout(&config);

    let (tx, mut rx) = mpsc::channel::<Message>(16);

    let tick_tx = tx.clone();
    let _subscription = hub.subscribe(move |sample| {
        let message = Message::Tick(sample.cloned());
        if tick_tx.try_send(message).is_err() {
            warn!("console is behind; tick dropped");
        }
    });

    let (_watcher, mut reloads) = ConfigWatcher::spawn(&path);
    let reload_tx = tx.clone();
    tokio::spawn(async move {
        while reloads.recv().await.is_some() {
            if reload_tx.send(Message::ConfigReloaded).await.is_err() {
                break;
            }
        }
    });

    let shutdown_tx = tx;
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(Message::Shutdown).await;
            }
            Err(e) => error!("cannot listen for Ctrl-C: {e}"),
        }
    });

    hub.start()?;

    while let Some(message) = rx.recv().await {
        match message {
            Message::Tick(sample) => {
                if let Err(e) = console.tick(sample, hub.history()) {
                    error!("cannot write frame: {e}");
                }
            }
            Message::ConfigReloaded => reload(&path, &mut config, &hub, &mut console).await,
            Message::Shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    hub.stop();
    console.stopped()?;
    Ok(())
}

/// Re-read the config file and apply what can change at runtime.
async fn reload(path: &Path, config: &mut RtpmConfig, hub: &Hub, console: &mut Console) {
    let fresh = match load_with_env(path) {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!("Config reload failed: {e}");
            return;
        }
    };

    if source_changed(&config.source, &fresh.source) {
        match rtpm_source::from_config(&fresh.source) {
            Ok(source) => hub.set_source(source).await,
            Err(e) => {
                warn!("keeping the current source: {e}");
                return;
            }
        }
    }
    if restart_needed(config, &fresh) {
        info!("interval and history changes take effect on restart");
    }

    console.reconfigure(&fresh);
    *config = fresh;
    info!("Config reloaded");
}

/// `true` when the acquirer has to be rebuilt.
fn source_changed(old: &SourceConfig, new: &SourceConfig) -> bool {
    old.endpoint.trim() != new.endpoint.trim()
        || old.timeout_ms != new.timeout_ms
        || old.seed != new.seed
}

fn restart_needed(old: &RtpmConfig, new: &RtpmConfig) -> bool {
    old.source.interval_ms != new.source.interval_ms || old.history != new.history
}
