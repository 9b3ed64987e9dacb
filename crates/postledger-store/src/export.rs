//! Tabular export of a ledger
//!
//! The export is a CSV table with a header row and the columns
//! `number, link, status, citations, created_at`. Statuses are written as
//! their display labels and citations share one cell, one per line.
//! [`parse_table`] reads the same format back.

use crate::StoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use postledger_domain::{Record, Status, UserId};
use serde::{Deserialize, Serialize};

/// Column names, in file order
pub const COLUMNS: [&str; 5] = ["number", "link", "status", "citations", "created_at"];

/// Separator between citations inside the citations cell
pub const CELL_CITATION_DELIMITER: &str = "\n";

/// Format of the `created_at` column (UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    number: u32,
    link: String,
    status: String,
    citations: String,
    created_at: String,
}

impl TableRow {
    fn from_record(record: &Record) -> Result<Self, StoreError> {
        Ok(Self {
            number: record.number,
            link: record.link.clone(),
            status: record.status.label().to_string(),
            citations: record.citations.join(CELL_CITATION_DELIMITER),
            created_at: format_timestamp(record.created_at)?,
        })
    }

    fn into_record(self) -> Result<Record, StoreError> {
        let status = Status::from_label(&self.status)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown status label: {}", self.status)))?;

        let citations = if self.citations.is_empty() {
            Vec::new()
        } else {
            self.citations
                .split(CELL_CITATION_DELIMITER)
                .map(str::to_string)
                .collect()
        };

        Ok(Record {
            number: self.number,
            link: self.link,
            status,
            citations,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Render records as a CSV table (header row always present)
pub fn render_table(records: &[Record]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(TableRow::from_record(record)?)?;
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Export(e.to_string()))
}

/// Parse a table produced by [`render_table`]
pub fn parse_table(bytes: &[u8]) -> Result<Vec<Record>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers()?;
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(StoreError::InvalidData(format!(
            "Unexpected table header: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    reader
        .deserialize::<TableRow>()
        .map(|row| row.map_err(StoreError::from).and_then(TableRow::into_record))
        .collect()
}

/// File name offered to the user for an export taken at `at`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("my_posts_{}.csv", at.format(FILENAME_TIMESTAMP_FORMAT))
}

/// File name used when shipping a backup of `user`'s ledger taken at `at`
pub fn backup_filename(user: UserId, at: DateTime<Utc>) -> String {
    format!("backup_user_{}_{}.csv", user, at.format(FILENAME_TIMESTAMP_FORMAT))
}

/// Render Unix seconds in [`TIMESTAMP_FORMAT`]
pub fn format_timestamp(secs: u64) -> Result<String, StoreError> {
    let at = DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .ok_or_else(|| StoreError::InvalidData(format!("Timestamp out of range: {}", secs)))?;
    Ok(at.format(TIMESTAMP_FORMAT).to_string())
}

/// Parse a [`TIMESTAMP_FORMAT`] string back to Unix seconds
pub fn parse_timestamp(text: &str) -> Result<u64, StoreError> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| StoreError::InvalidData(format!("Invalid timestamp '{}': {}", text, e)))?;
    let secs = naive.and_utc().timestamp();
    u64::try_from(secs)
        .map_err(|_| StoreError::InvalidData(format!("Timestamp before epoch: {}", text)))
}
