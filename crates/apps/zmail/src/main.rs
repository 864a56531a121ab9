//! Zmail - headless driver for the encrypted mailbox sync core
//!
//! Runs the sync manager against an in-memory demo mailbox and takes line
//! commands on stdin. Type `help` for the command list.

use log::{error, info, warn};
use mail::{Account, InMemoryBackend, MailSyncManager, SyncConfig};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

mod commands;
mod render;
mod seed;

use commands::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cfg = match SyncConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Sync config not usable, falling back to defaults: {}", e);
            if let Some(path) = SyncConfig::default_path() {
                warn!(
                    "To configure Zmail, either:\n\
                     1. Place settings at: {}\n\
                     2. Or set environment variables: ZMAIL_ACCOUNT, ZMAIL_REFRESH_MS, \
                     ZMAIL_SEARCH_DEBOUNCE_MS, ZMAIL_THREAD_MS",
                    path.display()
                );
            }
            SyncConfig::default()
        }
    };

    let mut account = cfg.account();
    if !account.is_connected() {
        warn!("No account configured, using the demo account");
        account = Account::new(seed::DEMO_ACCOUNT);
    }

    let backend = Arc::new(InMemoryBackend::new(account.clone()));
    seed::populate(&backend);

    let manager = MailSyncManager::with_initial_tab(
        backend.clone(),
        account.clone(),
        cfg.timing(),
        cfg.initial_tab,
    );
    let viewer = tokio::spawn(render::watch_view(manager.subscribe(), account.clone()));
    manager.start();
    info!("Zmail started for {}", account.medium());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match commands::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = commands::execute(&manager, &backend, command).await {
                    error!("{}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    manager.shutdown();
    viewer.abort();
    info!("Zmail stopped");
    Ok(())
}
