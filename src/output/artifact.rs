//! JSON artifact persistence
//!
//! A persisted run is a single pretty-printed JSON array of `BookRecord`s. The
//! array is first written to a sibling temp file and then renamed over the
//! target, so readers only ever see a complete artifact.

use crate::model::BookRecord;
use crate::output::{OutputError, OutputResult};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `books` to `path`, replacing any previous artifact
///
/// Missing parent directories are created.
pub fn write_artifact(path: &Path, books: &[BookRecord]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path)?;
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, books)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::debug!("Wrote {} records to {}", books.len(), path.display());
    Ok(())
}

/// Reads an artifact previously written by [`write_artifact`]
pub fn read_artifact(path: &Path) -> OutputResult<Vec<BookRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn temp_path_for(path: &Path) -> OutputResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("{} is not a file path", path.display())))?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
