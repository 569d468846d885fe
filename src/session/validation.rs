use crate::store::StudentRecord;

/// Check the identifying fields of a submitted record.
/// Returns all problems at once (not just the first).
pub fn validate_record(record: &StudentRecord) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if record.student_id.trim().is_empty() {
        errors.push("student_id: required".to_string());
    }
    if record.name.trim().is_empty() {
        errors.push("name: required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
