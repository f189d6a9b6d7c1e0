// Cache store for reading and writing the dataset file.
// Handles CSV encoding, atomic writes, and filesystem operations.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, WrangleError};
use crate::table::{Table, read_csv, write_csv};

/// Read a cached table, returning None if the file does not exist.
pub fn read_table(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = fs::File::open(path)?;
    let table = read_csv(BufReader::new(file)).map_err(|e| match e {
        WrangleError::CacheFormat { reason, .. } => WrangleError::CacheFormat {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;
    Ok(Some(table))
}

/// Write a table to the cache as CSV, replacing any existing file.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let written = write_temp(&temp_path, table)
        .and_then(|()| fs::rename(&temp_path, path).map_err(WrangleError::from));
    if written.is_err() && temp_path.exists() {
        // Keep the original error.
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_temp(temp_path: &Path, table: &Table) -> Result<()> {
    let file = fs::File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    write_csv(table, &mut writer)?;
    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
}

/// Check if a cache file exists.
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Get the modification time of a cache file.
pub fn modified_at(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
