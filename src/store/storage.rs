use super::types::{ScoreTable, StudentRecord, SCHEMA};
use crate::error::ScoreError;
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the default score file path (~/.config/class-scores/student_scores.csv)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("student_scores.csv")
}

/// Owner of the backing CSV file. Nothing else reads or writes it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the score table.
    ///
    /// If the file doesn't exist, it is created with the header row only and an
    /// empty table is returned. A header that is not exactly
    /// `student_id,name,chinese,math,english`, or any row that does not parse,
    /// fails with [`ScoreError::StorageRead`].
    pub fn load(&self) -> Result<ScoreTable, ScoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "score file missing, creating it");
            let table = ScoreTable::new();
            self.save(&table)?;
            return Ok(table);
        }

        let file = File::open(&self.path).map_err(|e| ScoreError::read(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| ScoreError::read(&self.path, e))?;
        if !headers.iter().eq(SCHEMA.iter().copied()) {
            return Err(ScoreError::read(
                &self.path,
                format!(
                    "unexpected columns '{}', expected '{}'",
                    headers.iter().collect::<Vec<_>>().join(","),
                    SCHEMA.join(",")
                ),
            ));
        }

        let mut records = Vec::new();
        for row in reader.deserialize::<StudentRecord>() {
            records.push(row.map_err(|e| ScoreError::read(&self.path, e))?);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded score table");
        Ok(ScoreTable::from_records(records))
    }

    /// Overwrite the file with the full table.
    ///
    /// The rows go to a temporary file next to the target which replaces it
    /// only on commit, so a failed write leaves the previous contents intact.
    pub fn save(&self, table: &ScoreTable) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ScoreError::write(&self.path, e))?;
            }
        }

        let mut file =
            AtomicWriteFile::open(&self.path).map_err(|e| ScoreError::write(&self.path, e))?;
        write_rows(&mut file, table).map_err(|e| ScoreError::write(&self.path, e))?;
        file.commit().map_err(|e| ScoreError::write(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), count = table.len(), "saved score table");
        Ok(())
    }
}

fn write_rows<W: Write>(out: W, table: &ScoreTable) -> Result<(), csv::Error> {
    // Header is written by hand so an empty table still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(SCHEMA)?;
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
