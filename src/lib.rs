use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod error;
pub mod fs;
pub mod i18n;
pub mod loader;
pub mod models;
pub mod plugin;
pub mod properties;
pub mod store;

use fs::LocalFileSystem;
use models::{HostConfig, MessageFilesConfig, CONF_ENABLE_DIAGNOSTICS_KEY};
use plugin::MessageFilesPlugin;
use store::InMemoryMessageStore;

pub fn build_plugin(
    host: &HostConfig,
    config: MessageFilesConfig,
    store: InMemoryMessageStore,
) -> Arc<MessageFilesPlugin> {
    let fs = Arc::new(LocalFileSystem::new(host.app_root.clone()));
    Arc::new(MessageFilesPlugin::new(
        Arc::new(store),
        fs,
        config,
        host.langs.clone(),
    ))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "message_files=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = match HostConfig::from_env() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = host.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }
    let config = MessageFilesConfig::from_env().map_err(error::MessageFilesError::from)?;
    if config.enable_diagnostics {
        tracing::info!("{} is on", CONF_ENABLE_DIAGNOSTICS_KEY);
    }
    if host.langs.is_empty() {
        tracing::warn!("APPLICATION_LANGS is empty, no locale will be loaded");
    }

    let store = InMemoryMessageStore::new();
    let plugin = build_plugin(&host, config, store.clone());
    plugin.on_application_start();

    tracing::info!(
        "Watching message files for {:?} every {}s",
        host.langs,
        host.poll_interval_secs
    );
    tracing::debug!("Locales in store: {:?}", store.locales());

    let interval = std::time::Duration::from_secs(host.poll_interval_secs);
    plugin
        .run(interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await;

    Ok(())
}
