//! Postledger Storage Layer
//!
//! Implements the LedgerStore trait with one SQLite database per user.
//!
//! # Architecture
//!
//! - One database file per user at `<data_dir>/user_<id>.db`
//! - Every mutation is a single transaction, so readers only ever see whole updates
//! - After each committed mutation the ledger is rendered as a CSV table and
//!   handed to an optional [`SnapshotObserver`] (the backup notifier)
//!
//! Lookup by link uses the `UNIQUE` index on `records.link`.
//!
//! # Examples
//!
//! ```no_run
//! use postledger_domain::{LedgerStore, Status, UserId};
//! use postledger_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::new("user_data").unwrap();
//! let user = UserId(42);
//! ledger.ensure_initialized(user).unwrap();
//! let number = ledger.append(user, "https://t.me/news/1", Status::First).unwrap();
//! assert_eq!(number, 1);
//! ```

#![warn(missing_docs)]

pub mod export;

use chrono::Utc;
use postledger_domain::{
    normalize_citation, LedgerSnapshot, LedgerStore, Record, SnapshotObserver, Status, UserId,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link is already in the user's ledger
    #[error("Duplicate link: {0}")]
    DuplicateLink(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Table rendering or parsing failed
    #[error("Export error: {0}")]
    Export(String),
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Export(e.to_string())
    }
}

/// SQLite-based implementation of LedgerStore
///
/// Connections are opened per call, so the ledger itself holds no per-user
/// state and can be shared across threads. Callers are responsible for not
/// running two mutations for the same user at once.
pub struct SqliteLedger {
    data_dir: PathBuf,
    observer: Option<Arc<dyn SnapshotObserver>>,
}

impl SqliteLedger {
    /// Create a ledger rooted at `data_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            observer: None,
        })
    }

    /// Attach the receiver of post-mutation snapshots
    pub fn with_observer(mut self, observer: Arc<dyn SnapshotObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Root directory of all ledgers
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of a user's database file
    pub fn ledger_path(&self, user: UserId) -> PathBuf {
        self.data_dir.join(format!("user_{}.db", user))
    }

    /// Whether the user has a ledger on disk
    pub fn has_ledger(&self, user: UserId) -> bool {
        self.ledger_path(user).exists()
    }

    /// Render the user's ledger as a CSV table
    ///
    /// A user without a ledger gets a table with only the header row.
    pub fn export_table(&self, user: UserId) -> Result<Vec<u8>, StoreError> {
        let records = self.list_all(user)?;
        export::render_table(&records)
    }

    /// Open (and create if necessary) the user's database
    fn open(&self, user: UserId) -> Result<Connection, StoreError> {
        let path = self.ledger_path(user);
        let created = !path.exists();

        let conn = Connection::open(&path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(include_str!("schema.sql"))?;

        if created {
            info!("Created ledger for user {} at {}", user, path.display());
        }
        Ok(conn)
    }

    /// Open the user's database only if it already exists
    fn open_existing(&self, user: UserId) -> Result<Option<Connection>, StoreError> {
        if self.has_ledger(user) {
            self.open(user).map(Some)
        } else {
            Ok(None)
        }
    }

    fn now() -> u64 {
        Utc::now().timestamp().max(0) as u64
    }

    fn parse_status(s: &str) -> Result<Status, StoreError> {
        Status::parse(s).ok_or_else(|| StoreError::InvalidData(format!("Unknown status: {}", s)))
    }

    fn conversion_error(column: usize, e: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    }

    fn load_record(conn: &Connection, link: &str) -> Result<Option<Record>, StoreError> {
        let record = conn
            .query_row(
                "SELECT number, link, status, created_at FROM records WHERE link = ?1",
                params![link],
                |row| {
                    let status: String = row.get(2)?;
                    let status = Self::parse_status(&status).map_err(|e| Self::conversion_error(2, e))?;
                    Ok(Record::new(
                        row.get(0)?,
                        row.get(1)?,
                        status,
                        row.get::<_, i64>(3)? as u64,
                    ))
                },
            )
            .optional()?;

        let Some(mut record) = record else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT text FROM citations WHERE record_number = ?1 ORDER BY position",
        )?;
        let number = record.number;
        record.citations = stmt
            .query_map(params![number], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(Some(record))
    }

    fn load_all(conn: &Connection) -> Result<Vec<Record>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT number, link, status, created_at FROM records ORDER BY number",
        )?;
        let mut records = stmt
            .query_map([], |row| {
                let status: String = row.get(2)?;
                let status = Self::parse_status(&status).map_err(|e| Self::conversion_error(2, e))?;
                Ok(Record::new(
                    row.get(0)?,
                    row.get(1)?,
                    status,
                    row.get::<_, i64>(3)? as u64,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT record_number, text FROM citations ORDER BY record_number, position",
        )?;
        let mut citations: HashMap<u32, Vec<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (number, text) = row?;
            citations.entry(number).or_default().push(text);
        }

        for record in &mut records {
            if let Some(list) = citations.remove(&record.number) {
                record.citations = list;
            }
        }

        Ok(records)
    }

    /// Hand a rendered copy of the ledger to the observer, if any
    ///
    /// Rendering failures are logged; the mutation has already been committed.
    fn notify(&self, user: UserId, conn: &Connection) {
        let Some(observer) = &self.observer else {
            return;
        };

        let taken_at = Utc::now();
        let rendered = Self::load_all(conn).and_then(|records| export::render_table(&records));
        match rendered {
            Ok(bytes) => observer.ledger_changed(LedgerSnapshot {
                user,
                filename: export::backup_filename(user, taken_at),
                bytes,
                taken_at: taken_at.timestamp().max(0) as u64,
            }),
            Err(e) => warn!("Failed to snapshot ledger for user {}: {}", user, e),
        }
    }
}

impl LedgerStore for SqliteLedger {
    type Error = StoreError;

    fn ensure_initialized(&self, user: UserId) -> Result<(), Self::Error> {
        self.open(user)?;
        Ok(())
    }

    fn exists(&self, user: UserId, link: &str) -> Result<bool, Self::Error> {
        let Some(conn) = self.open_existing(user)? else {
            return Ok(false);
        };

        let exists = conn
            .query_row(
                "SELECT 1 FROM records WHERE link = ?1",
                params![link],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        Ok(exists)
    }

    fn find(&self, user: UserId, link: &str) -> Result<Option<Record>, Self::Error> {
        match self.open_existing(user)? {
            Some(conn) => Self::load_record(&conn, link),
            None => Ok(None),
        }
    }

    fn append(&self, user: UserId, link: &str, status: Status) -> Result<u32, Self::Error> {
        let mut conn = self.open(user)?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM records WHERE link = ?1",
                params![link],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::DuplicateLink(link.to_string()));
        }

        let count: u32 = tx.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        let number = count + 1;

        tx.execute(
            "INSERT INTO records (number, link, status, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![number, link, status.as_str(), Self::now() as i64],
        )?;
        tx.commit()?;

        debug!("User {} appended record #{} ({})", user, number, link);
        self.notify(user, &conn);
        Ok(number)
    }

    fn set_status(&self, user: UserId, link: &str, status: Status) -> Result<bool, Self::Error> {
        let Some(mut conn) = self.open_existing(user)? else {
            warn!("Status update for user {} without a ledger", user);
            return Ok(false);
        };

        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE records SET status = ?1 WHERE link = ?2",
            params![status.as_str(), link],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!("User {} set status of {} to {}", user, link, status);
        self.notify(user, &conn);
        Ok(true)
    }

    fn add_citation(&self, user: UserId, link: &str, text: &str) -> Result<bool, Self::Error> {
        let Some(text) = normalize_citation(text) else {
            return Ok(false);
        };
        let Some(mut conn) = self.open_existing(user)? else {
            warn!("Citation for user {} without a ledger", user);
            return Ok(false);
        };

        let tx = conn.transaction()?;
        let number: Option<u32> = tx
            .query_row(
                "SELECT number FROM records WHERE link = ?1",
                params![link],
                |row| row.get(0),
            )
            .optional()?;

        let Some(number) = number else {
            return Ok(false);
        };

        let position: u32 = tx.query_row(
            "SELECT COUNT(*) FROM citations WHERE record_number = ?1",
            params![number],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO citations (record_number, position, text) VALUES (?1, ?2, ?3)",
            params![number, position, text],
        )?;
        tx.commit()?;

        debug!("User {} added citation #{} to record #{}", user, position + 1, number);
        self.notify(user, &conn);
        Ok(true)
    }

    fn list_all(&self, user: UserId) -> Result<Vec<Record>, Self::Error> {
        match self.open_existing(user)? {
            Some(conn) => Self::load_all(&conn),
            None => Ok(Vec::new()),
        }
    }
}
