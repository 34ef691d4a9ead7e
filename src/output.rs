use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::record::TimetableRecord;

pub const DEFAULT_OUT_FILE: &str = "timetables.json";

/// Pretty JSON (2 space indent, umlauts kept as is) with a trailing newline.
pub fn to_json(records: &[TimetableRecord]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

pub fn write_json(records: &[TimetableRecord], out_files: &[PathBuf]) -> Result<()> {
    let json = to_json(records)?;
    for path in out_files {
        write_one(path, &json)?;
    }
    Ok(())
}

fn write_one(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
