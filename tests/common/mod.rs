//! Common test utilities and helpers

#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch app directory with helpers for writing inputs
pub struct AppDir {
    temp_dir: TempDir,
}

impl AppDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Write a text file and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write(name, &serde_json::to_string_pretty(value).unwrap())
    }

    pub fn read_json(&self, name: &str) -> Value {
        serde_json::from_str(&fs::read_to_string(self.join(name)).unwrap()).unwrap()
    }
}

pub const CHANNELS_TSV: &str = "name\ttype\tstatus\n\
MEG0111\tMAG\tgood\n\
MEG0112\tGRAD\tbad\n\
EEG001\tEEG\tbad\n";
