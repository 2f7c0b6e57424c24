//! BIDS `channels.tsv` reader.

use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{common, ErrorCode, Result, UtilsError};

/// Value of the `status` column marking a channel as bad.
pub const BAD_STATUS: &str = "bad";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRow {
    pub name: String,
    /// `type` column, when the file has one.
    #[serde(rename = "type")]
    pub ch_type: Option<String>,
    pub status: String,
}

impl ChannelRow {
    pub fn is_bad(&self) -> bool {
        self.status == BAD_STATUS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelsTable {
    rows: Vec<ChannelRow>,
}

impl ChannelsTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(common::file_not_found("Channels file", path));
        }
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|e| e.with_context(path.display()))
    }

    /// Parse tab-separated content with a header row. The `name` and
    /// `status` columns are required; any other column except `type` is
    /// ignored. Rows with trailing cells left off read those cells as empty.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let name_idx = column("name").ok_or_else(|| missing_column("name"))?;
        let status_idx = column("status").ok_or_else(|| missing_column("status"))?;
        let type_idx = column("type");

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default().to_string();
            rows.push(ChannelRow {
                name: cell(name_idx),
                ch_type: type_idx.map(cell),
                status: cell(status_idx),
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ChannelRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names of channels with `status == "bad"`, in file order.
    pub fn bad_channels(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.is_bad())
            .map(|row| row.name.clone())
            .collect()
    }
}

fn missing_column(column: &str) -> UtilsError {
    UtilsError::storage_with_code(
        ErrorCode::STORAGE_INVALID_TABLE,
        format!("channels table has no '{}' column", column),
        None,
    )
}
