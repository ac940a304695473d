use crate::constants::{CREATE_TABLE_SQL, INDEXES, INSERT_ROW_SQL, TABLE_NAME};
use crate::error::{LoaderError, Result};
use crate::types::OutputRow;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Destination of a bulk load.
///
/// Each step is a separate call so the pipeline decides the order and what
/// to undo when one of them fails. Expected order:
/// `create_table`, `relax_durability`, `begin`, `insert`*, `create_indexes`,
/// `commit`, `release`. `rollback` abandons an open transaction.
pub trait RowSink {
    fn create_table(&mut self) -> Result<()>;
    fn relax_durability(&mut self) -> Result<()>;
    fn begin(&mut self) -> Result<()>;
    fn insert(&mut self, row: &OutputRow) -> Result<()>;
    fn create_indexes(&mut self) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;
    fn release(&mut self);
}

/// SQLite file destination.
///
/// Durability is relaxed (`synchronous = OFF`) for the one-shot load. If the
/// process dies mid-load the open transaction never commits: SQLite discards
/// it from the rollback journal on next open, leaving an empty `rows` table.
/// An OS crash or power loss with synchronous off may corrupt the file
/// outright. Either way the operator deletes the file and reruns.
pub struct SqliteSink {
    conn: Connection,
    path: PathBuf,
    in_transaction: bool,
}

impl SqliteSink {
    /// Open (creating if needed) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        debug!(path = %path.display(), "opened destination database");
        Ok(Self {
            conn,
            path,
            in_transaction: false,
        })
    }

    fn table_exists(&self) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![TABLE_NAME],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl RowSink for SqliteSink {
    fn create_table(&mut self) -> Result<()> {
        if self.table_exists()? {
            return Err(LoaderError::DestinationExists {
                table: TABLE_NAME.to_string(),
                path: self.path.clone(),
            });
        }
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(())
    }

    fn relax_durability(&mut self) -> Result<()> {
        self.conn.execute_batch("PRAGMA synchronous = OFF")?;
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        self.in_transaction = true;
        Ok(())
    }

    fn insert(&mut self, row: &OutputRow) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_ROW_SQL)?;
        stmt.execute(params![
            row.block_fips,
            row.tract_fips,
            row.county_fips,
            row.max_ad_down,
            row.max_ad_up,
            row.provider_id,
        ])?;
        Ok(())
    }

    fn create_indexes(&mut self) -> Result<()> {
        for (name, column) in INDEXES {
            let sql = format!("CREATE INDEX {name} ON {TABLE_NAME} ({column});");
            self.conn.execute_batch(&sql)?;
            debug!(index = name, "created index");
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        if self.conn.is_autocommit() {
            // SQLite already rolled back on its own (e.g. after a disk-full error)
            warn!("transaction was already rolled back by SQLite");
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        info!("load transaction rolled back");
        Ok(())
    }

    fn release(&mut self) {
        self.conn.flush_prepared_statement_cache();
    }
}

/// In-memory destination recording every call, for exercising the pipeline
/// without a database. Failures can be injected per operation.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<OutputRow>,
    pub calls: Vec<&'static str>,
    pub committed: bool,
    pub fail_insert_at: Option<usize>,
    pub fail_index_build: bool,
    table_created: bool,
    in_transaction: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the insert that would become row number `index` (0-based)
    pub fn failing_insert_at(mut self, index: usize) -> Self {
        self.fail_insert_at = Some(index);
        self
    }

    pub fn failing_index_build(mut self) -> Self {
        self.fail_index_build = true;
        self
    }

    fn failure(message: &str) -> LoaderError {
        LoaderError::Sink {
            message: message.to_string(),
        }
    }
}

impl RowSink for MemorySink {
    fn create_table(&mut self) -> Result<()> {
        self.calls.push("create_table");
        if self.table_created {
            return Err(LoaderError::DestinationExists {
                table: TABLE_NAME.to_string(),
                path: PathBuf::from(":memory:"),
            });
        }
        self.table_created = true;
        Ok(())
    }

    fn relax_durability(&mut self) -> Result<()> {
        self.calls.push("relax_durability");
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.calls.push("begin");
        self.in_transaction = true;
        self.committed = false;
        Ok(())
    }

    fn insert(&mut self, row: &OutputRow) -> Result<()> {
        if !self.in_transaction {
            return Err(Self::failure("insert outside transaction"));
        }
        if self.fail_insert_at == Some(self.rows.len()) {
            return Err(Self::failure("injected insert failure"));
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn create_indexes(&mut self) -> Result<()> {
        self.calls.push("create_indexes");
        if self.fail_index_build {
            return Err(Self::failure("injected index failure"));
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.calls.push("commit");
        self.in_transaction = false;
        self.committed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.calls.push("rollback");
        if self.in_transaction {
            self.rows.clear();
            self.in_transaction = false;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.calls.push("release");
    }
}
