use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::metrics::LoadMetrics;
use crate::pipeline::reader::RecordReader;
use crate::pipeline::storage::{RowSink, SqliteSink};
use crate::pipeline::transform::transform;
use crate::types::LoadSummary;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Running counts for one load run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTracker {
    every: u64,
    read: u64,
    filtered: u64,
    written: u64,
}

impl ProgressTracker {
    /// `every == 0` disables progress reports
    pub fn new(every: u64) -> Self {
        Self {
            every,
            ..Self::default()
        }
    }

    pub fn record_read(&mut self) {
        self.read += 1;
    }

    pub fn record_filtered(&mut self) {
        self.filtered += 1;
    }

    /// Count a written row; true when the new total is a reporting milestone
    pub fn record_written(&mut self) -> bool {
        self.written += 1;
        self.every > 0 && self.written % self.every == 0
    }

    pub fn read(&self) -> u64 {
        self.read
    }

    pub fn filtered(&self) -> u64 {
        self.filtered
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Load `input` into the SQLite file named by `config`.
    ///
    /// The input header is validated before the destination is opened, so a
    /// missing or unreadable input never creates a database file.
    #[instrument(skip_all, fields(input = %input.display(), db = %config.db_path.display()))]
    pub fn load_file(input: &Path, config: &LoaderConfig) -> Result<LoadSummary> {
        info!(
            "Loading {} into {}",
            input.display(),
            config.db_path.display()
        );

        let mut reader = RecordReader::from_path(input)?;
        let mut sink = SqliteSink::open(&config.db_path)?;
        let summary = Self::run(&mut reader, &mut sink, config.progress_every)?;

        info!("Generated {}", config.db_path.display());
        Ok(summary)
    }

    /// Drive every record from `reader` into `sink` under one transaction,
    /// then build the indexes and commit.
    ///
    /// Any failure after `begin` rolls the transaction back before the error
    /// is returned; nothing from a failed run is committed.
    pub fn run<R: Read, S: RowSink>(
        reader: &mut RecordReader<R>,
        sink: &mut S,
        progress_every: u64,
    ) -> Result<LoadSummary> {
        let start = Instant::now();

        sink.create_table()?;
        sink.relax_durability()?;
        sink.begin()?;

        let mut progress = ProgressTracker::new(progress_every);
        if let Err(e) = Self::stream_rows(reader, sink, &mut progress) {
            Self::abandon(sink);
            return Err(e);
        }

        info!("Added {} rows, creating indexes now", progress.written());
        let index_start = Instant::now();
        if let Err(e) = sink.create_indexes() {
            error!(error = %e, "index build failed");
            Self::abandon(sink);
            return Err(LoaderError::IndexBuild {
                source: Box::new(e),
            });
        }
        LoadMetrics::record_index_build(index_start.elapsed().as_secs_f64());

        if let Err(e) = sink.commit() {
            Self::abandon(sink);
            return Err(e);
        }
        sink.release();

        let elapsed = start.elapsed();
        LoadMetrics::record_load_complete(elapsed.as_secs_f64());

        Ok(LoadSummary {
            records_read: progress.read(),
            records_filtered: progress.filtered(),
            rows_written: progress.written(),
            elapsed,
        })
    }

    fn stream_rows<R: Read, S: RowSink>(
        reader: &mut RecordReader<R>,
        sink: &mut S,
        progress: &mut ProgressTracker,
    ) -> Result<()> {
        while let Some(record) = reader.next_record()? {
            progress.record_read();
            LoadMetrics::record_read();

            let line = record.line;
            let Some(row) = transform(record)? else {
                progress.record_filtered();
                LoadMetrics::record_filtered();
                continue;
            };

            if let Err(e) = sink.insert(&row) {
                LoadMetrics::record_write_error();
                error!(line, row = %reader.describe_current(), "failed to store row");
                return Err(LoaderError::Write {
                    line,
                    source: Box::new(e),
                });
            }
            LoadMetrics::record_written();

            if progress.record_written() {
                info!("Stored {} rows in the database", progress.written());
            }
        }
        Ok(())
    }

    fn abandon<S: RowSink>(sink: &mut S) {
        if let Err(e) = sink.rollback() {
            warn!(error = %e, "rollback failed");
        }
        sink.release();
    }
}
