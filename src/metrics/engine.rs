use crate::error::ScoreError;
use crate::store::{ScoreTable, StudentRecord, Subject};
use serde::Serialize;

/// The figures on the class overview cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub student_count: usize,
    pub averages: Vec<SubjectAverage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectAverage {
    pub subject: Subject,
    pub average: f64,
}

/// Arithmetic mean of one subject across every record.
pub fn subject_average(table: &ScoreTable, subject: Subject) -> Result<f64, ScoreError> {
    if table.is_empty() {
        return Err(ScoreError::EmptyTable);
    }
    let sum: u32 = table.iter().map(|r| u32::from(r.score(subject))).sum();
    Ok(f64::from(sum) / table.len() as f64)
}

/// Averages for all three subjects in [`Subject::ALL`] order
pub fn subject_averages(table: &ScoreTable) -> Result<Vec<SubjectAverage>, ScoreError> {
    Subject::ALL
        .iter()
        .map(|&subject| {
            subject_average(table, subject).map(|average| SubjectAverage { subject, average })
        })
        .collect()
}

pub fn class_summary(table: &ScoreTable) -> Result<ClassSummary, ScoreError> {
    Ok(ClassSummary {
        student_count: table.len(),
        averages: subject_averages(table)?,
    })
}

/// The `n` records with the highest total, best first.
///
/// Equal totals keep their insertion order. Asking for more records than the
/// table holds returns all of them.
pub fn top_n(table: &ScoreTable, n: usize) -> Result<Vec<&StudentRecord>, ScoreError> {
    if table.is_empty() {
        return Err(ScoreError::EmptyTable);
    }
    let mut ranked: Vec<&StudentRecord> = table.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total().cmp(&a.total()));
    ranked.truncate(n);
    Ok(ranked)
}

/// Subject scores in fixed order with the first repeated at the end, so the
/// points form a closed polygon.
pub fn radar_profile(record: &StudentRecord) -> [(Subject, u8); 4] {
    let [first, second, third] = Subject::ALL;
    [
        (first, record.score(first)),
        (second, record.score(second)),
        (third, record.score(third)),
        (first, record.score(first)),
    ]
}

/// Round to one decimal place for display
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_totals() -> ScoreTable {
        // totals 150, 280, 200
        ScoreTable::from_records(vec![
            StudentRecord::new("001", "An", 50, 50, 50),
            StudentRecord::new("002", "Bo", 90, 90, 100),
            StudentRecord::new("003", "Cai", 60, 70, 70),
        ])
    }

    #[test]
    fn test_subject_average_exact() {
        let table = ScoreTable::from_records(vec![
            StudentRecord::new("001", "An", 80, 13, 99),
            StudentRecord::new("002", "Bo", 90, 71, 2),
        ]);
        assert_eq!(subject_average(&table, Subject::Chinese).unwrap(), 85.0);
        assert_eq!(subject_average(&table, Subject::Math).unwrap(), 42.0);
        assert_eq!(subject_average(&table, Subject::English).unwrap(), 50.5);
    }

    #[test]
    fn test_subject_average_empty_table() {
        let table = ScoreTable::new();
        assert!(matches!(
            subject_average(&table, Subject::Math),
            Err(ScoreError::EmptyTable)
        ));
    }

    #[test]
    fn test_class_summary() {
        let summary = class_summary(&table_with_totals()).unwrap();
        assert_eq!(summary.student_count, 3);
        assert_eq!(summary.averages.len(), 3);
        assert_eq!(summary.averages[0].subject, Subject::Chinese);
        assert!((summary.averages[0].average - 66.666).abs() < 0.01);
        assert_eq!(summary.averages[2].subject, Subject::English);
        assert_eq!(summary.averages[2].average, 220.0 / 3.0);
    }

    #[test]
    fn test_class_summary_empty() {
        assert!(matches!(
            class_summary(&ScoreTable::new()),
            Err(ScoreError::EmptyTable)
        ));
    }

    #[test]
    fn test_top_n_orders_by_total_descending() {
        let table = table_with_totals();
        let top = top_n(&table, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].total(), 280);
        assert_eq!(top[1].total(), 200);
    }

    #[test]
    fn test_top_n_larger_than_table_returns_all() {
        let table = table_with_totals();
        let top = top_n(&table, 10).unwrap();
        let totals: Vec<u16> = top.iter().map(|r| r.total()).collect();
        assert_eq!(totals, vec![280, 200, 150]);
    }

    #[test]
    fn test_top_n_ties_keep_insertion_order() {
        let table = ScoreTable::from_records(vec![
            StudentRecord::new("001", "An", 70, 70, 70),
            StudentRecord::new("002", "Bo", 100, 100, 100),
            StudentRecord::new("003", "Cai", 80, 60, 70),
            StudentRecord::new("004", "Dan", 60, 80, 70),
        ]);
        let top = top_n(&table, 4).unwrap();
        let ids: Vec<&str> = top.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["002", "001", "003", "004"]);
    }

    #[test]
    fn test_top_n_zero() {
        assert!(top_n(&table_with_totals(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_top_n_empty_table() {
        assert!(matches!(top_n(&ScoreTable::new(), 5), Err(ScoreError::EmptyTable)));
    }

    #[test]
    fn test_radar_profile_closes_polygon() {
        let record = StudentRecord::new("001", "Mei", 88, 92, 76);
        assert_eq!(
            radar_profile(&record),
            [
                (Subject::Chinese, 88),
                (Subject::Math, 92),
                (Subject::English, 76),
                (Subject::Chinese, 88),
            ]
        );
    }

    #[test]
    fn test_radar_profile_over_score_grid() {
        for (c, m, e) in [(0, 0, 0), (100, 0, 50), (1, 2, 3), (100, 100, 100)] {
            let profile = radar_profile(&StudentRecord::new("x", "y", c, m, e));
            let scores: Vec<u8> = profile.iter().map(|(_, s)| *s).collect();
            assert_eq!(scores, vec![c, m, e, c]);
        }
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(85.0), 85.0);
        assert_eq!(round1(72.25), 72.3);
    }
}
