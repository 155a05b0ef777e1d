use crate::store::MessageStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct I18n {
    store: Arc<dyn MessageStore>,
}

impl I18n {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        I18n { store }
    }

    pub fn localize(&self, key: &str, lang: Option<&str>) -> String {
        let language_code = lang
            .and_then(|l| l.split(['-', '_']).next())
            .map(|l| l.to_lowercase());

        if let Some(code) = language_code.as_deref() {
            if let Some(messages) = self.store.get(code) {
                if let Some(val) = messages.get(key) {
                    return val.clone();
                }
            }
        }

        // Fallback
        if let Some(defaults) = self.store.defaults() {
            if let Some(val) = defaults.get(key) {
                return val.clone();
            }
        }

        key.to_string()
    }
}
