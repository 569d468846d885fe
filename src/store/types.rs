use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the backing file. Total is never persisted.
pub const SCHEMA: [&str; 5] = ["student_id", "name", "chinese", "math", "english"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Chinese,
    Math,
    English,
}

impl Subject {
    /// Fixed display and profile order
    pub const ALL: [Subject; 3] = [Subject::Chinese, Subject::Math, Subject::English];

    /// Column name in the backing file
    pub fn column(self) -> &'static str {
        match self {
            Subject::Chinese => "chinese",
            Subject::Math => "math",
            Subject::English => "english",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::Chinese => "Chinese",
            Subject::Math => "Math",
            Subject::English => "English",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One student's identifying fields plus three subject scores.
///
/// Scores are expected in 0..=100; the input surface enforces the range, the
/// store does not re-check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub chinese: u8,
    pub math: u8,
    pub english: u8,
}

impl StudentRecord {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        chinese: u8,
        math: u8,
        english: u8,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            chinese,
            math,
            english,
        }
    }

    pub fn score(&self, subject: Subject) -> u8 {
        match subject {
            Subject::Chinese => self.chinese,
            Subject::Math => self.math,
            Subject::English => self.english,
        }
    }

    /// Sum of the three subject scores, recomputed on every call
    pub fn total(&self) -> u16 {
        u16::from(self.chinese) + u16::from(self.math) + u16::from(self.english)
    }

    /// Lowest of the three subject scores
    pub fn weakest_score(&self) -> u8 {
        self.chinese.min(self.math).min(self.english)
    }
}

/// All records of the session, in arrival order. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    records: Vec<StudentRecord>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    /// Append a record. Duplicate student IDs are accepted as-is.
    pub fn push(&mut self, record: StudentRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying this name
    pub fn find_by_name(&self, name: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Unique names in first-seen order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a ScoreTable {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_scores() {
        let record = StudentRecord::new("001", "Mei", 88, 92, 76);
        assert_eq!(record.total(), 256);
    }

    #[test]
    fn test_total_at_extremes() {
        assert_eq!(StudentRecord::new("1", "a", 0, 0, 0).total(), 0);
        assert_eq!(StudentRecord::new("2", "b", 100, 100, 100).total(), 300);
    }

    #[test]
    fn test_total_exhaustive_small_grid() {
        for c in (0..=100u8).step_by(10) {
            for m in (0..=100u8).step_by(25) {
                for e in [0u8, 33, 100] {
                    let record = StudentRecord::new("x", "y", c, m, e);
                    assert_eq!(record.total(), c as u16 + m as u16 + e as u16);
                }
            }
        }
    }

    #[test]
    fn test_score_by_subject() {
        let record = StudentRecord::new("001", "Mei", 88, 92, 76);
        assert_eq!(record.score(Subject::Chinese), 88);
        assert_eq!(record.score(Subject::Math), 92);
        assert_eq!(record.score(Subject::English), 76);
        assert_eq!(record.weakest_score(), 76);
    }

    #[test]
    fn test_push_keeps_arrival_order() {
        let mut table = ScoreTable::new();
        table.push(StudentRecord::new("002", "Bo", 70, 70, 70));
        table.push(StudentRecord::new("001", "An", 80, 80, 80));
        let ids: Vec<&str> = table.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["002", "001"]);
    }

    #[test]
    fn test_duplicate_ids_are_allowed() {
        let mut table = ScoreTable::new();
        table.push(StudentRecord::new("001", "An", 80, 80, 80));
        table.push(StudentRecord::new("001", "An", 90, 90, 90));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let table = ScoreTable::from_records(vec![
            StudentRecord::new("001", "An", 80, 80, 80),
            StudentRecord::new("002", "An", 90, 90, 90),
        ]);
        assert_eq!(table.find_by_name("An").unwrap().student_id, "001");
        assert!(table.find_by_name("Bo").is_none());
    }

    #[test]
    fn test_names_are_unique_in_first_seen_order() {
        let table = ScoreTable::from_records(vec![
            StudentRecord::new("001", "Mei", 80, 80, 80),
            StudentRecord::new("002", "An", 90, 90, 90),
            StudentRecord::new("003", "Mei", 70, 70, 70),
        ]);
        assert_eq!(table.names(), vec!["Mei", "An"]);
    }
}
