use crate::error::{LoadError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};
use tracing::{debug, trace};

use super::chunk::{Chunk, Value};
use super::utils::is_null_marker;

/// Upper bound on rows preallocated per chunk; larger chunks grow on demand.
const MAX_PREALLOC_ROWS: usize = 65_536;

/// Options for [`ChunkReader::open`].
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub chunk_size: usize,
    pub delimiter: u8,
    pub trim_headers: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            delimiter: b',',
            trim_headers: true,
        }
    }
}

/// Lazily reads a CSV file as a sequence of [`Chunk`]s.
///
/// The file is opened by [`ChunkReader::open`] and closed when the reader is
/// dropped. Iteration stops for good after the first error.
pub struct ChunkReader {
    path: PathBuf,
    reader: csv::Reader<File>,
    columns: Vec<String>,
    chunk_size: usize,
    record: StringRecord,
    next_index: usize,
    rows_read: u64,
    done: bool,
}

impl std::fmt::Debug for ChunkReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkReader")
            .field("path", &self.path)
            .field("columns", &self.columns)
            .field("chunk_size", &self.chunk_size)
            .field("rows_read", &self.rows_read)
            .finish()
    }
}

impl ChunkReader {
    #[tracing::instrument(level = "debug", skip(path, opts), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P, opts: &ReaderOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if opts.chunk_size == 0 {
            return Err(LoadError::Config("chunk_size must be positive".into()));
        }

        let file = File::open(&path).map_err(|source| LoadError::FileAccess {
            path: path.clone(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(opts.delimiter)
            .flexible(true) // ragged rows are checked by hand below
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| csv_error(&path, 0, e))?
            .clone();
        if headers.is_empty() {
            return Err(LoadError::parse(&path, 0, "no header row"));
        }
        let columns = dedupe_headers(headers.iter().map(|h| {
            if opts.trim_headers {
                h.trim().to_string()
            } else {
                h.to_string()
            }
        }));
        debug!(columns = columns.len(), "opened source");

        Ok(Self {
            path,
            reader,
            columns,
            chunk_size: opts.chunk_size,
            record: StringRecord::new(),
            next_index: 0,
            rows_read: 0,
            done: false,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut chunk = Chunk::new(self.next_index, self.rows_read + 1, self.columns.clone());
        chunk.rows.reserve(self.chunk_size.min(MAX_PREALLOC_ROWS));

        while chunk.rows.len() < self.chunk_size {
            let row_no = self.rows_read + 1;
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| csv_error(&self.path, row_no, e))?;
            if !more {
                break;
            }
            chunk.rows.push(self.convert_record(row_no)?);
            self.rows_read = row_no;
        }

        if chunk.rows.is_empty() {
            return Ok(None);
        }
        trace!(index = chunk.index, rows = chunk.rows.len(), "read chunk");
        self.next_index += 1;
        Ok(Some(chunk))
    }

    fn convert_record(&self, row_no: u64) -> Result<Vec<Value>> {
        let width = self.columns.len();
        if self.record.len() > width {
            return Err(LoadError::parse(
                &self.path,
                row_no,
                format!("expected {} fields, saw {}", width, self.record.len()),
            ));
        }
        let mut row: Vec<Value> = self
            .record
            .iter()
            .map(|field| {
                if is_null_marker(field) {
                    Value::Null
                } else {
                    Value::Text(field.to_string())
                }
            })
            .collect();
        row.resize(width, Value::Null);
        Ok(row)
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for ChunkReader {}

fn csv_error(path: &Path, row: u64, err: csv::Error) -> LoadError {
    let detail = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => {
            LoadError::parse(path, row, detail)
        }
        // seek and serde kinds never come from plain record reads
        _ => LoadError::Unexpected(format!(
            "reading {} (row {}): {}",
            path.display(),
            row,
            detail
        )),
    }
}

/// Repeated names get a `.1`, `.2`, ... suffix so every column stays addressable.
fn dedupe_headers(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            out.push(name);
        } else {
            out.push(format!("{}.{}", name, count));
        }
        *count += 1;
    }
    out
}
