use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Read-only view of the filesystem the loader scans.
pub trait FileSystem: Send + Sync {
    fn resolve(&self, path: &str) -> PathBuf;
    fn is_dir(&self, path: &Path) -> bool;
    /// Regular files directly inside `dir`, in enumeration order.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>>;
}

#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    app_root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
        }
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }
}

impl FileSystem for LocalFileSystem {
    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_root.join(path)
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // Names that are not valid UTF-8 can never contain the extension we look for.
            if let Some(name) = entry.file_name().to_str() {
                files.push(FileEntry {
                    name: name.to_string(),
                    path,
                });
            }
        }
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }
}
