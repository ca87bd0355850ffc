use std::fmt;
use std::path::Path;

use crate::error::LoadError;

/// One line of user-facing console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Inserted { rows: u64, table: String },
    DatabaseError(String),
    FileNotFound(String),
    FileUnreadable { path: String, detail: String },
    ParseError(String),
    ConfigError(String),
    Unexpected(String),
    RowCount { table: String, rows: u64 },
    RowCountFailed(String),
    Loaded { rows: u64, chunks: usize, table: String },
    Stopped { rows: u64, chunks: usize },
}

impl Notice {
    /// Map a load failure to the notice the user sees.
    pub fn from_error(err: &LoadError, source_path: &Path) -> Self {
        match err {
            e if e.is_not_found() => Notice::FileNotFound(source_path.display().to_string()),
            LoadError::FileAccess { path, source } => Notice::FileUnreadable {
                path: path.display().to_string(),
                detail: source.to_string(),
            },
            LoadError::Parse { .. } => Notice::ParseError(err.to_string()),
            LoadError::DatabaseWrite { .. } => Notice::DatabaseError(err.to_string()),
            LoadError::CountCheck { .. } => Notice::RowCountFailed(err.to_string()),
            LoadError::Config(m) => Notice::ConfigError(m.clone()),
            LoadError::Unexpected(m) => Notice::Unexpected(m.clone()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Inserted { rows, table } => write!(f, "Inserted {} rows into {}", rows, table),
            Notice::DatabaseError(d) => write!(f, "Database error: {}", d),
            Notice::FileNotFound(p) => write!(f, "CSV file not found at: {}", p),
            Notice::FileUnreadable { path, detail } => {
                write!(f, "Could not read CSV file at: {}: {}", path, detail)
            }
            Notice::ParseError(d) => write!(f, "CSV parse error: {}", d),
            Notice::ConfigError(d) => write!(f, "Configuration error: {}", d),
            Notice::Unexpected(d) => write!(f, "Unexpected error: {}", d),
            Notice::RowCount { table, rows } => write!(f, "Total rows now in {}: {}", table, rows),
            Notice::RowCountFailed(d) => write!(f, "Could not verify row count: {}", d),
            Notice::Loaded { rows, chunks, table } => {
                write!(f, "Loaded {} rows in {} chunks into {}", rows, chunks, table)
            }
            Notice::Stopped { rows, chunks } => {
                write!(f, "Load stopped after {} rows in {} chunks", rows, chunks)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn errors_map_to_their_notice() {
        let path = Path::new("/data/audit.csv");

        let missing = LoadError::FileAccess {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            Notice::from_error(&missing, path).to_string(),
            "CSV file not found at: /data/audit.csv"
        );

        let denied = LoadError::FileAccess {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            Notice::from_error(&denied, path).to_string(),
            "Could not read CSV file at: /data/audit.csv: denied"
        );

        let parse = LoadError::parse(path, 7, "expected 2 fields, saw 3");
        assert_eq!(
            Notice::from_error(&parse, path).to_string(),
            "CSV parse error: /data/audit.csv (row 7): expected 2 fields, saw 3"
        );

        let other = LoadError::Unexpected("boom".into());
        assert_eq!(Notice::from_error(&other, path).to_string(), "Unexpected error: boom");
    }

    #[test]
    fn progress_lines() {
        let n = Notice::Inserted {
            rows: 10_000,
            table: "auditinputfiles".into(),
        };
        assert_eq!(n.to_string(), "Inserted 10000 rows into auditinputfiles");
        let c = Notice::RowCount {
            table: "t".into(),
            rows: 25_000,
        };
        assert_eq!(c.to_string(), "Total rows now in t: 25000");
    }
}
