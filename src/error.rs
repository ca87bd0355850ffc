use std::path::PathBuf;
use thiserror::Error;

/// Every way a load can go wrong.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source file missing or unreadable. Raised before any insert.
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content. `row` is the 1-based data row, or 0 for the header.
    #[error("{} (row {row}): {detail}", .path.display())]
    Parse {
        path: PathBuf,
        row: u64,
        detail: String,
    },

    /// Append failed: type mismatch, constraint violation, lost connection.
    #[error("writing chunk {chunk} into {table}: {source}")]
    DatabaseWrite {
        table: String,
        chunk: usize,
        #[source]
        source: sqlx::Error,
    },

    /// The verification query failed. Never fatal.
    #[error("counting rows in {table}: {source}")]
    CountCheck {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Unexpected(String),
}

impl LoadError {
    pub fn parse(path: impl Into<PathBuf>, row: u64, detail: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.into(),
            row,
            detail: detail.into(),
        }
    }

    /// True when the source file itself was never found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::FileAccess { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

impl From<figment::Error> for LoadError {
    fn from(err: figment::Error) -> Self {
        LoadError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
