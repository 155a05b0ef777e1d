use crate::models::Messages;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Host-owned message registry the loader writes into.
pub trait MessageStore: Send + Sync {
    fn get(&self, locale: &str) -> Option<Messages>;
    fn put(&self, locale: &str, messages: Messages);
    /// Additive merge into the default table, creating it when absent.
    fn put_all_defaults(&self, messages: Messages);
    fn defaults(&self) -> Option<Messages>;
}

#[derive(Debug, Default)]
struct Tables {
    locales: HashMap<String, Messages>,
    defaults: Option<Messages>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locales(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let mut locales: Vec<String> = tables.locales.keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn message(&self, locale: &str, key: &str) -> Option<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.locales.get(locale).and_then(|m| m.get(key)).cloned()
    }

    pub fn default_message(&self, key: &str) -> Option<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.defaults.as_ref().and_then(|m| m.get(key)).cloned()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn get(&self, locale: &str) -> Option<Messages> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.locales.get(locale).cloned()
    }

    fn put(&self, locale: &str, messages: Messages) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.locales.insert(locale.to_string(), messages);
    }

    fn put_all_defaults(&self, messages: Messages) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.defaults.get_or_insert_with(Messages::new).extend(messages);
    }

    fn defaults(&self) -> Option<Messages> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.defaults.clone()
    }
}
