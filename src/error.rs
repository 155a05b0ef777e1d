use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageFilesError {
    #[error("{0} is not defined in configuration")]
    ConfigMissing(&'static str),

    #[error("directory {} could not be found", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: Box<MessageFilesError>,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("could not list {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),
}

pub type Result<T> = std::result::Result<T, MessageFilesError>;
