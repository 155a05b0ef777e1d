use crate::error::{MessageFilesError, Result};
use crate::fs::{FileEntry, FileSystem};
use crate::models::{
    MergePolicy, MessageFilesConfig, Messages, CONF_DEFAULT_LOCALE_KEY, CONF_LANGS_PATH_KEY,
};
use crate::properties;
use crate::store::MessageStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;

const PROPERTIES_EXTENSION: &str = ".properties";

/// Outcome of one `load()` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// False when configuration problems turned the call into a no-op.
    pub performed: bool,
    pub loaded_locales: Vec<String>,
    pub missing_locales: Vec<String>,
    /// Locales whose directory exists but could not be enumerated.
    pub skipped_locales: Vec<String>,
    pub unreadable_files: Vec<PathBuf>,
    pub messages_loaded: usize,
}

pub struct LocaleMessageLoader<S: MessageStore + ?Sized, F: FileSystem + ?Sized> {
    store: Arc<S>,
    fs: Arc<F>,
    config: MessageFilesConfig,
    langs: Vec<String>,
    last_loaded: DateTime<Utc>,
    // Files already reported with an mtime ahead of the clock.
    future_mtimes: Mutex<HashSet<PathBuf>>,
}

impl<S: MessageStore + ?Sized, F: FileSystem + ?Sized> LocaleMessageLoader<S, F> {
    pub fn new(store: Arc<S>, fs: Arc<F>, config: MessageFilesConfig, langs: Vec<String>) -> Self {
        Self {
            store,
            fs,
            config,
            langs,
            last_loaded: DateTime::<Utc>::UNIX_EPOCH,
            future_mtimes: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &MessageFilesConfig {
        &self.config
    }

    pub fn langs(&self) -> &[String] {
        &self.langs
    }

    pub fn last_loaded(&self) -> DateTime<Utc> {
        self.last_loaded
    }

    /// Re-scans every known locale directory and writes the result into the store.
    pub fn load(&mut self) -> LoadSummary {
        // Taken before any file is read, so a write during the pass still counts as a change.
        let started = Utc::now();
        self.diag(format_args!("going to load messages"));
        let mut summary = LoadSummary::default();

        let default_locale = self.config.default_locale.clone();
        if default_locale.is_none() {
            warn!("{}", MessageFilesError::ConfigMissing(CONF_DEFAULT_LOCALE_KEY));
        }

        let Some(langs_path) = self.config.path.clone() else {
            warn!("{}", MessageFilesError::ConfigMissing(CONF_LANGS_PATH_KEY));
            return summary;
        };

        let langs_root = self.fs.resolve(&langs_path);
        if !self.fs.is_dir(&langs_root) {
            error!(
                "{} is defined in configuration but {}",
                CONF_LANGS_PATH_KEY,
                MessageFilesError::DirectoryMissing(langs_root)
            );
            return summary;
        }

        for locale in &self.langs {
            self.load_locale(
                locale,
                &langs_path,
                &langs_root,
                default_locale.as_deref(),
                &mut summary,
            );
        }

        summary.performed = true;
        self.last_loaded = self.last_loaded.max(started);

        self.diag(format_args!("loaded {} messages total", summary.messages_loaded));
        self.diag(format_args!("done loading messages"));
        summary
    }

    /// True as soon as one property file is newer than the last completed load.
    pub fn has_changed(&self) -> bool {
        let Some(langs_path) = self.config.path.as_deref() else {
            return false;
        };
        let langs_root = self.fs.resolve(langs_path);
        if !self.fs.is_dir(&langs_root) {
            return false;
        }

        for locale in &self.langs {
            let locale_root = langs_root.join(locale);
            if !self.fs.is_dir(&locale_root) {
                continue;
            }

            let files = match self.property_files(&locale_root) {
                Ok(files) => files,
                Err(e) => {
                    debug!("Change check skipped {} locale: {}", locale, e);
                    continue;
                }
            };

            for file in files {
                match self.fs.modified(&file.path) {
                    Ok(modified) if modified > self.last_loaded => {
                        self.warn_if_future(&file.path, modified);
                        self.diag(format_args!("{} changed since last load", file.path.display()));
                        return true;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        debug!("Could not read modification time of {}: {}", file.path.display(), e)
                    }
                }
            }
        }

        false
    }

    pub fn reconcile_if_changed(&mut self) -> Option<LoadSummary> {
        if self.has_changed() {
            Some(self.load())
        } else {
            None
        }
    }

    fn load_locale(
        &self,
        locale: &str,
        langs_path: &str,
        langs_root: &Path,
        default_locale: Option<&str>,
        summary: &mut LoadSummary,
    ) {
        self.diag(format_args!("found {} locale in known locales", locale));

        let locale_root = langs_root.join(locale);
        if !self.fs.is_dir(&locale_root) {
            warn!("Could not find {} locale in {}", locale, langs_path);
            summary.missing_locales.push(locale.to_string());
            return;
        }

        let files = match self.property_files(&locale_root) {
            Ok(files) => files,
            Err(e) => {
                error!("{}; skipping {} locale", e, locale);
                summary.skipped_locales.push(locale.to_string());
                return;
            }
        };

        self.diag(format_args!(
            "going to load {} messages from {}",
            locale,
            locale_root.display()
        ));

        if self.config.merge_policy == MergePolicy::Replace {
            self.store.put(locale, Messages::new());
        }

        let is_default = default_locale == Some(locale);
        for file in &files {
            self.diag(format_args!("going to load messages from {}", file.path.display()));

            let prefixed = match self.read_prefixed(file) {
                Ok(prefixed) => prefixed,
                Err(e) => {
                    warn!("{}", e);
                    summary.unreadable_files.push(file.path.clone());
                    continue;
                }
            };
            let count = prefixed.len();

            // Prefixed entries win over whatever the table already holds.
            let mut merged = self.store.get(locale).unwrap_or_default();
            merged.extend(prefixed.iter().map(|(k, v)| (k.clone(), v.clone())));
            self.store.put(locale, merged);

            self.diag(format_args!("loaded {} messages", count));
            summary.messages_loaded += count;

            if is_default {
                self.store.put_all_defaults(prefixed);
                self.diag(format_args!("locale {} is default", locale));
            }
        }

        summary.loaded_locales.push(locale.to_string());
        self.diag(format_args!("done loading {} messages", locale));
    }

    fn property_files(&self, dir: &Path) -> Result<Vec<FileEntry>> {
        let files = self
            .fs
            .list_files(dir)
            .map_err(|source| MessageFilesError::Filesystem {
                path: dir.to_path_buf(),
                source,
            })?;
        Ok(files.into_iter().filter(|f| is_property_file(&f.name)).collect())
    }

    fn read_prefixed(&self, file: &FileEntry) -> Result<Messages> {
        let unreadable = |source: MessageFilesError| MessageFilesError::FileUnreadable {
            path: file.path.clone(),
            source: Box::new(source),
        };

        let content = self
            .fs
            .read_to_string(&file.path)
            .map_err(|e| unreadable(e.into()))?;
        let entries = properties::parse(&content).map_err(unreadable)?;

        let prefix = prefix_for(&file.name);
        Ok(entries
            .into_iter()
            .map(|(key, value)| (format!("{}.{}", prefix, key.trim()), normalize_value(&value)))
            .collect())
    }

    // A future mtime stays newer than every load, so each poll reloads until the clock catches up.
    fn warn_if_future(&self, path: &Path, modified: DateTime<Utc>) {
        if modified <= Utc::now() {
            return;
        }
        let mut seen = self.future_mtimes.lock().unwrap_or_else(|e| e.into_inner());
        if seen.insert(path.to_path_buf()) {
            warn!(
                "{} has a modification time in the future ({}); it will be reloaded on every check until then",
                path.display(),
                modified
            );
        }
    }

    fn diag(&self, message: std::fmt::Arguments<'_>) {
        if self.config.enable_diagnostics {
            info!("MessageFiles: {}", message);
        }
    }
}

// Substring match: "foo.properties.bak" counts as a property file.
pub fn is_property_file(name: &str) -> bool {
    name.contains(PROPERTIES_EXTENSION)
}

// Removes the first occurrence of the extension, wherever it sits in the name.
pub fn prefix_for(name: &str) -> String {
    name.replacen(PROPERTIES_EXTENSION, "", 1)
}

pub fn normalize_value(value: &str) -> String {
    let value = value.trim();
    value.strip_prefix('=').unwrap_or(value).trim().to_string()
}
