//! Optional auxiliary input files (MEG calibration, cross-talk, events, ...).
//!
//! Apps receive these as path parameters in `config.json`. Any of them may be
//! absent, blank, or point at a file the platform never staged. Resolved
//! files are copied into the app output directory under fixed names so that
//! downstream apps find them next to the data.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{common, ErrorExt, Result};

/// The kinds of optional input an app can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalFileKind {
    CrossTalk,
    Calibration,
    Events,
    HeadPos,
    Channels,
    Destination,
}

impl OptionalFileKind {
    pub const ALL: [OptionalFileKind; 6] = [
        OptionalFileKind::CrossTalk,
        OptionalFileKind::Calibration,
        OptionalFileKind::Events,
        OptionalFileKind::HeadPos,
        OptionalFileKind::Channels,
        OptionalFileKind::Destination,
    ];

    /// Parameter name in `config.json`.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::CrossTalk => "crosstalk",
            Self::Calibration => "calibration",
            Self::Events => "events",
            Self::HeadPos => "headshape",
            Self::Channels => "channels",
            Self::Destination => "destination",
        }
    }

    /// Parameter carrying a replacement file from the `meg/fif-override`
    /// datatype. Cross-talk and calibration have none.
    pub fn override_key(self) -> Option<&'static str> {
        match self {
            Self::CrossTalk | Self::Calibration => None,
            Self::Events => Some("events_override"),
            Self::HeadPos => Some("headshape_override"),
            Self::Channels => Some("channels_override"),
            Self::Destination => Some("destination_override"),
        }
    }

    /// File name the input is copied to in the output directory.
    pub fn staged_name(self) -> &'static str {
        match self {
            Self::CrossTalk => "crosstalk_meg.fif",
            Self::Calibration => "calibration_meg.dat",
            Self::Events => "events.tsv",
            Self::HeadPos => "headshape.pos",
            Self::Channels => "channels.tsv",
            Self::Destination => "destination.fif",
        }
    }

    /// Key used for this kind in [`OptionalFiles`] maps and report messages.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::CrossTalk => "cross_talk_file",
            Self::Calibration => "calibration_file",
            Self::Events => "events_file",
            Self::HeadPos => "head_pos_file",
            Self::Channels => "channels_file",
            Self::Destination => "destination",
        }
    }
}

/// Resolved optional inputs. `None` means not provided or not on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionalFiles {
    pub cross_talk_file: Option<PathBuf>,
    pub calibration_file: Option<PathBuf>,
    pub events_file: Option<PathBuf>,
    pub head_pos_file: Option<PathBuf>,
    pub channels_file: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl OptionalFiles {
    pub fn get(&self, kind: OptionalFileKind) -> Option<&Path> {
        self.slot(kind).as_deref()
    }

    pub fn set(&mut self, kind: OptionalFileKind, path: Option<PathBuf>) {
        *self.slot_mut(kind) = path;
    }

    /// Present files in [`OptionalFileKind::ALL`] order.
    pub fn present(&self) -> impl Iterator<Item = (OptionalFileKind, &Path)> + '_ {
        OptionalFileKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }

    fn slot(&self, kind: OptionalFileKind) -> &Option<PathBuf> {
        match kind {
            OptionalFileKind::CrossTalk => &self.cross_talk_file,
            OptionalFileKind::Calibration => &self.calibration_file,
            OptionalFileKind::Events => &self.events_file,
            OptionalFileKind::HeadPos => &self.head_pos_file,
            OptionalFileKind::Channels => &self.channels_file,
            OptionalFileKind::Destination => &self.destination,
        }
    }

    fn slot_mut(&mut self, kind: OptionalFileKind) -> &mut Option<PathBuf> {
        match kind {
            OptionalFileKind::CrossTalk => &mut self.cross_talk_file,
            OptionalFileKind::Calibration => &mut self.calibration_file,
            OptionalFileKind::Events => &mut self.events_file,
            OptionalFileKind::HeadPos => &mut self.head_pos_file,
            OptionalFileKind::Channels => &mut self.channels_file,
            OptionalFileKind::Destination => &mut self.destination,
        }
    }
}

/// Pull every optional file parameter out of `config`, resolve overrides,
/// and stage the resolved files into `out_dir`.
///
/// The file keys and override keys are removed from `config` whether or not
/// they resolve, so the remaining parameters can be handed to processing
/// code as-is.
pub fn read_optional_files(
    config: &mut AppConfig,
    out_dir: impl AsRef<Path>,
) -> Result<OptionalFiles> {
    let files = resolve_optional_files(config)?;
    copy_optional_files(&files, out_dir)?;
    Ok(files)
}

/// Resolve optional files without copying anything.
///
/// Every file parameter is type-checked before any is removed, so `config`
/// is left untouched when one of them is not a path string.
pub fn resolve_optional_files(config: &mut AppConfig) -> Result<OptionalFiles> {
    for key in file_keys() {
        config.get_path(key).map_err(|_| common::wrong_type("Config", key, PATH_EXPECTED))?;
    }

    let mut files = OptionalFiles::default();

    for kind in OptionalFileKind::ALL {
        let mut resolved = existing(config.take_path(kind.config_key())?);

        if let Some(override_key) = kind.override_key() {
            if let Some(candidate) = config.take_path(override_key)? {
                if candidate.exists() {
                    debug!(kind = ?kind, path = %candidate.display(), "Using override file");
                    resolved = Some(candidate);
                } else {
                    warn!(
                        kind = ?kind,
                        path = %candidate.display(),
                        "Override file does not exist, keeping the original"
                    );
                }
            }
        }

        debug!(kind = ?kind, path = ?resolved, "Resolved optional file");
        files.set(kind, resolved);
    }

    Ok(files)
}

/// Copy each present optional file into `out_dir` under its staged name.
pub fn copy_optional_files(files: &OptionalFiles, out_dir: impl AsRef<Path>) -> Result<()> {
    let out_dir = out_dir.as_ref();

    for (kind, source) in files.present() {
        if !source.exists() {
            return Err(common::file_not_found("Optional input file", source));
        }
        let dest = out_dir.join(kind.staged_name());
        if is_same_file(source, &dest) {
            debug!(kind = ?kind, path = %dest.display(), "Optional file already staged");
            continue;
        }
        fs::copy(source, &dest).to_storage_error(format!(
            "Failed to copy {} to {}",
            source.display(),
            dest.display()
        ))?;
        info!(kind = ?kind, dest = %dest.display(), "Staged optional file");
    }

    Ok(())
}

/// Create each directory (and its parents). Existing directories are fine.
pub fn ensure_output_dirs<I, P>(dirs: I) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for dir in dirs {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .to_storage_error(format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

const PATH_EXPECTED: &str = "a file path string";

fn file_keys() -> impl Iterator<Item = &'static str> {
    OptionalFileKind::ALL
        .into_iter()
        .flat_map(|kind| std::iter::once(kind.config_key()).chain(kind.override_key()))
}

fn existing(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| p.exists())
}

#[cfg(test)]
mod tests;
