use std::io::Write;
use tracing::{error, info, instrument, warn};

use crate::config::LoaderConfig;
use crate::error::{LoadError, Result};
use crate::process::{ChunkReader, RuleSet};
use crate::report::Notice;
use crate::sink::TableSink;

/// What happened during one run.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Chunks appended and committed.
    pub chunks: usize,
    /// Rows appended across those chunks.
    pub rows: u64,
    /// Why the load phase stopped early, if it did.
    pub failure: Option<LoadError>,
    /// `None` when the count check is disabled.
    pub row_count: Option<Result<u64>>,
}

impl LoadReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn verified_count(&self) -> Option<u64> {
        match &self.row_count {
            Some(Ok(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Open → {read chunk → normalize → append}* → close → count check.
pub struct Loader<S> {
    config: LoaderConfig,
    rules: RuleSet,
    sink: S,
}

impl<S: TableSink> Loader<S> {
    pub fn new(config: LoaderConfig, sink: S) -> Self {
        let rules = config.rule_set();
        Self {
            config,
            rules,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run the whole pipeline, writing notices to `out`. Never returns an
    /// error: failures end up in the report.
    #[instrument(level = "info", skip(self, out), fields(source = %self.config.source_path.display(), table = %self.sink.table_name()))]
    pub async fn run<W: Write>(&mut self, out: &mut W) -> LoadReport {
        let mut report = LoadReport::default();

        match self.load(out, &mut report).await {
            Ok(()) => {
                info!(rows = report.rows, chunks = report.chunks, "load complete");
                emit(
                    out,
                    Notice::Loaded {
                        rows: report.rows,
                        chunks: report.chunks,
                        table: self.sink.table_name().to_string(),
                    },
                );
            }
            Err(e) => {
                error!(rows = report.rows, chunks = report.chunks, "load stopped: {}", e);
                emit(out, Notice::from_error(&e, &self.config.source_path));
                emit(
                    out,
                    Notice::Stopped {
                        rows: report.rows,
                        chunks: report.chunks,
                    },
                );
                report.failure = Some(e);
            }
        }

        if self.config.verify_count {
            let counted = self.sink.count_rows().await;
            match &counted {
                Ok(rows) => emit(
                    out,
                    Notice::RowCount {
                        table: self.sink.table_name().to_string(),
                        rows: *rows,
                    },
                ),
                Err(e) => {
                    warn!("row count check failed: {}", e);
                    emit(out, Notice::RowCountFailed(e.to_string()));
                }
            }
            report.row_count = Some(counted);
        }

        self.sink.close().await;
        report
    }

    async fn load<W: Write>(&mut self, out: &mut W, report: &mut LoadReport) -> Result<()> {
        // reader (and its file handle) is dropped when this returns
        let reader = ChunkReader::open(&self.config.source_path, &self.config.reader_options())?;
        info!(columns = reader.columns().len(), rules = self.rules.len(), "source opened");

        for chunk in reader {
            let mut chunk = chunk?;
            self.rules.normalize(&mut chunk);
            let written = self.sink.append(&chunk).await?;

            report.chunks += 1;
            report.rows += written;
            emit(
                out,
                Notice::Inserted {
                    rows: written,
                    table: self.sink.table_name().to_string(),
                },
            );
        }
        Ok(())
    }
}

fn emit<W: Write>(out: &mut W, notice: Notice) {
    if let Err(e) = writeln!(out, "{}", notice) {
        warn!("could not write notice {:?}: {}", notice, e);
    }
}
