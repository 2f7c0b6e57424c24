//! Channel metadata of a recording: names, types and bad channels.
//!
//! Recordings themselves are read by the processing code; the helpers here
//! only need their channel metadata, which apps exchange as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ErrorCode, ErrorExt, Result, UtilsError};

pub mod table;

pub use table::{ChannelRow, ChannelsTable, BAD_STATUS};

/// Warning shown in the report when `channels.tsv` overrides the bads
/// stored with the recording.
pub const BADS_UPDATED_WARNING: &str = "Bad channels from the info of your MEG file are different from \
those in the channels.tsv file. By default, only bad channels from channels.tsv are considered as bad: \
the info of your MEG file is updated with those channels.";

/// Measurement metadata relevant to channel handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub ch_names: Vec<String>,
    pub ch_types: Vec<String>,
    #[serde(default)]
    pub bads: Vec<String>,
}

impl ChannelInfo {
    pub fn n_channels(&self) -> usize {
        self.ch_names.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Raw,
    Epochs,
    Evoked,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Raw => "raw",
            DataKind::Epochs => "epochs",
            DataKind::Evoked => "evoked",
        };
        f.write_str(name)
    }
}

/// A recording as seen by the helpers: its kind plus channel metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub kind: DataKind,
    pub info: ChannelInfo,
}

impl Recording {
    pub fn new(kind: DataKind, info: ChannelInfo) -> Self {
        Self { kind, info }
    }

    /// Read a recording description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .to_storage_error(format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).map_err(|e| {
            UtilsError::validation_with_code(
                ErrorCode::VALIDATION_INVALID_INPUT,
                format!("{} is not a valid recording description", path.display()),
                None,
            )
            .with_source(e)
        })
    }
}

/// Count and names of the channels of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTypeSummary {
    pub count: usize,
    pub names: Vec<String>,
}

/// Replace `info.bads` with the bad channels listed in `channels_file`.
///
/// Returns the user warning when the two sets differ (order ignored), and
/// `None` when they agree or no file was given. `info` is only modified in
/// the first case.
pub fn update_bads(
    info: &mut ChannelInfo,
    channels_file: Option<&Path>,
) -> Result<Option<String>> {
    let Some(channels_file) = channels_file else {
        return Ok(None);
    };

    let table = ChannelsTable::from_path(channels_file)?;
    Ok(apply_bads(info, table.bad_channels()))
}

/// Same comparison as [`update_bads`] against an already-parsed bad list.
pub fn apply_bads(info: &mut ChannelInfo, bad_channels: Vec<String>) -> Option<String> {
    let mut current = info.bads.clone();
    current.sort();
    let mut incoming = bad_channels.clone();
    incoming.sort();

    if current == incoming {
        debug!(bads = ?current, "Bad channels already match channels.tsv");
        return None;
    }

    warn!(
        previous = ?info.bads,
        updated = ?bad_channels,
        "Replacing bad channels with those from channels.tsv"
    );
    info.bads = bad_channels;
    Some(BADS_UPDATED_WARNING.to_string())
}

/// Check that a recording was provided and, if `expected` is not empty,
/// that its kind is one of `expected`.
pub fn validate_input(data: Option<&Recording>, expected: &[DataKind]) -> Result<()> {
    let data = data.ok_or_else(|| {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_DATA_MISSING,
            "Input data is None",
            None,
        )
    })?;

    if !expected.is_empty() && !expected.contains(&data.kind) {
        let expected = expected
            .iter()
            .map(DataKind::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(UtilsError::validation_with_code(
            ErrorCode::VALIDATION_DATA_KIND,
            format!("Expected data type {}, got {}", expected, data.kind),
            None,
        ));
    }

    Ok(())
}

/// Group channels by type. Keys are sorted; names keep channel order.
pub fn channel_types_summary(
    info: &ChannelInfo,
) -> Result<BTreeMap<String, ChannelTypeSummary>> {
    if info.ch_names.len() != info.ch_types.len() {
        return Err(UtilsError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_INPUT,
            format!(
                "{} channel names but {} channel types",
                info.ch_names.len(),
                info.ch_types.len()
            ),
            Some("ch_types".to_string()),
        ));
    }

    let mut summary: BTreeMap<String, ChannelTypeSummary> = BTreeMap::new();
    for (name, ch_type) in info.ch_names.iter().zip(&info.ch_types) {
        let entry = summary
            .entry(ch_type.clone())
            .or_insert_with(|| ChannelTypeSummary {
                count: 0,
                names: Vec::new(),
            });
        entry.count += 1;
        entry.names.push(name.clone());
    }

    Ok(summary)
}
