//! Session-scoped state: the in-memory score table and the store it came from.
//!
//! Every user action is a [`Command`] applied to the session, producing an
//! [`Outcome`] and a new table for the caller to re-render.

pub mod validation;

pub use validation::validate_record;

use crate::error::ScoreError;
use crate::store::{RecordStore, ScoreTable, StudentRecord};

#[derive(Debug, Clone)]
pub enum Command {
    /// Append a record and persist the table
    Submit(StudentRecord),
    /// Replace the table with what is on disk
    Reload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Saved { name: String },
    Reloaded { count: usize },
}

pub struct Session {
    store: RecordStore,
    table: ScoreTable,
}

impl Session {
    /// Load the table from the store to start a session
    pub fn open(store: RecordStore) -> Result<Self, ScoreError> {
        let table = store.load()?;
        Ok(Self { store, table })
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Apply a command. On error the previous table is left untouched.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, ScoreError> {
        match command {
            Command::Submit(record) => self.submit(record).map(|name| Outcome::Saved { name }),
            Command::Reload => self.reload().map(|count| Outcome::Reloaded { count }),
        }
    }

    /// Append a record and persist the table, returning the stored name.
    ///
    /// Identifying fields are trimmed before validation, so whitespace-only
    /// values count as missing.
    pub fn submit(&mut self, record: StudentRecord) -> Result<String, ScoreError> {
        let record = StudentRecord {
            student_id: record.student_id.trim().to_string(),
            name: record.name.trim().to_string(),
            ..record
        };
        validate_record(&record).map_err(ScoreError::Validation)?;

        let name = record.name.clone();
        let mut next = self.table.clone();
        next.push(record);
        self.store.save(&next)?;
        self.table = next;

        tracing::info!(name = %name, count = self.table.len(), "saved student scores");
        Ok(name)
    }

    /// Replace the table with what is on disk, returning the new row count
    pub fn reload(&mut self) -> Result<usize, ScoreError> {
        let table = self.store.load()?;
        let count = table.len();
        self.table = table;
        tracing::debug!(count, "reloaded session table");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open_session(dir: &TempDir) -> Session {
        Session::open(RecordStore::new(dir.path().join("scores.csv"))).unwrap()
    }

    #[test]
    fn test_open_on_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir);
        assert!(session.table().is_empty());
    }

    #[test]
    fn test_submit_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);

        let outcome = session
            .apply(Command::Submit(StudentRecord::new("001", "Mei", 88, 92, 76)))
            .unwrap();
        assert_eq!(outcome, Outcome::Saved { name: "Mei".to_string() });
        assert_eq!(session.table().len(), 1);

        let reopened = open_session(&dir);
        assert_eq!(reopened.table(), session.table());
    }

    #[test]
    fn test_submit_rejects_missing_fields() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);

        let err = session
            .apply(Command::Submit(StudentRecord::new("", "", 1, 2, 3)))
            .unwrap_err();
        match err {
            ScoreError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(session.table().is_empty());
    }

    #[test]
    fn test_submit_trims_identifying_fields() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);

        let name = session
            .submit(StudentRecord::new(" 001 ", " Mei ", 1, 2, 3))
            .unwrap();
        assert_eq!(name, "Mei");
        assert_eq!(session.table().records()[0].student_id, "001");
        assert_eq!(session.table().records()[0].name, "Mei");

        let reopened = open_session(&dir);
        assert!(reopened.table().find_by_name("Mei").is_some());
    }

    #[test]
    fn test_submit_rejects_whitespace_only_fields() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);

        let err = session
            .submit(StudentRecord::new("001", "   ", 1, 2, 3))
            .unwrap_err();
        assert!(matches!(err, ScoreError::Validation(_)), "got {:?}", err);
        assert!(session.table().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);
        session
            .apply(Command::Submit(StudentRecord::new("001", "Mei", 88, 92, 76)))
            .unwrap();

        // Replace the data file with a directory so the rename cannot land
        let path = session.store().path().to_path_buf();
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = session
            .apply(Command::Submit(StudentRecord::new("002", "Bo", 1, 2, 3)))
            .unwrap_err();
        assert!(matches!(err, ScoreError::StorageWrite { .. }), "got {:?}", err);
        assert_eq!(session.table().len(), 1);
    }

    #[test]
    fn test_reload_replaces_table() {
        let dir = TempDir::new().unwrap();
        let mut first = open_session(&dir);
        let mut second = open_session(&dir);

        first
            .apply(Command::Submit(StudentRecord::new("001", "Mei", 88, 92, 76)))
            .unwrap();
        assert!(second.table().is_empty());

        let outcome = second.apply(Command::Reload).unwrap();
        assert_eq!(outcome, Outcome::Reloaded { count: 1 });
        assert_eq!(second.table(), first.table());
    }

    #[test]
    fn test_failed_reload_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);
        session
            .apply(Command::Submit(StudentRecord::new("001", "Mei", 88, 92, 76)))
            .unwrap();

        fs::write(session.store().path(), "garbage\n").unwrap();

        assert!(matches!(
            session.apply(Command::Reload),
            Err(ScoreError::StorageRead { .. })
        ));
        assert_eq!(session.table().len(), 1);
    }
}
