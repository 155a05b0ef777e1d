use crate::fs::FileSystem;
use crate::i18n::I18n;
use crate::loader::{LoadSummary, LocaleMessageLoader};
use crate::models::MessageFilesConfig;
use crate::store::MessageStore;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

type DynLoader = LocaleMessageLoader<dyn MessageStore, dyn FileSystem>;

/// Host-side adapter: lifecycle hooks plus the change-detection poll loop.
pub struct MessageFilesPlugin {
    store: Arc<dyn MessageStore>,
    // One in-flight load at a time; startup and polls may come from different threads.
    loader: Mutex<DynLoader>,
}

impl MessageFilesPlugin {
    pub fn new(
        store: Arc<dyn MessageStore>,
        fs: Arc<dyn FileSystem>,
        config: MessageFilesConfig,
        langs: Vec<String>,
    ) -> Self {
        debug!(
            "MessageFiles plugin created for {:?} (merge policy: {})",
            langs, config.merge_policy
        );
        let loader = LocaleMessageLoader::new(store.clone(), fs, config, langs);
        Self {
            store,
            loader: Mutex::new(loader),
        }
    }

    pub fn i18n(&self) -> I18n {
        I18n::new(self.store.clone())
    }

    pub fn on_application_start(&self) -> LoadSummary {
        let summary = self.loader().load();
        log_summary(&summary);
        summary
    }

    pub fn detect_change(&self) -> Option<LoadSummary> {
        let summary = self.loader().reconcile_if_changed();
        if let Some(summary) = &summary {
            info!("Message files changed, reloaded");
            log_summary(summary);
        }
        summary
    }

    /// Polls for changes every `interval` until `shutdown` resolves.
    pub async fn run<F>(self: Arc<Self>, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; startup already loaded.
        ticker.tick().await;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping message file change detection");
                    break;
                }
                _ = ticker.tick() => {
                    let plugin = self.clone();
                    if let Err(e) = tokio::task::spawn_blocking(move || plugin.detect_change()).await {
                        error!("Change detection task failed: {}", e);
                    }
                }
            }
        }
    }

    fn loader(&self) -> MutexGuard<'_, DynLoader> {
        self.loader.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn log_summary(summary: &LoadSummary) {
    if !summary.performed {
        return;
    }
    info!(
        "Loaded {} messages for locales {:?}",
        summary.messages_loaded, summary.loaded_locales
    );
    if !summary.skipped_locales.is_empty() {
        error!("Skipped unreadable locale folders: {:?}", summary.skipped_locales);
    }
    if !summary.unreadable_files.is_empty() {
        debug!("Unreadable message files: {:?}", summary.unreadable_files);
    }
}
