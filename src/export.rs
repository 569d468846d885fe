use crate::error::ScoreError;
use crate::store::{ScoreTable, SCHEMA};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark so spreadsheet applications pick the right encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Serialize)]
struct ExportRow<'a> {
    student_id: &'a str,
    name: &'a str,
    chinese: u8,
    math: u8,
    english: u8,
    total: u16,
}

/// Serialize the table with a derived `total` column, prefixed with a BOM.
pub fn export_csv(table: &ScoreTable) -> Result<Vec<u8>, ScoreError> {
    let to_error = |e: csv::Error| ScoreError::write(Path::new("<export>"), e);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    let mut header: Vec<&str> = SCHEMA.to_vec();
    header.push("total");
    writer.write_record(&header).map_err(to_error)?;

    for record in table {
        writer
            .serialize(ExportRow {
                student_id: &record.student_id,
                name: &record.name,
                chinese: record.chinese,
                math: record.math,
                english: record.english,
                total: record.total(),
            })
            .map_err(to_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| ScoreError::write(Path::new("<export>"), e.error()))
}

/// Resolve where the export artifact goes: absolute names are used as-is,
/// relative ones land next to the data file.
pub fn resolve_export_path(data_path: &Path, file_name: &str) -> PathBuf {
    let candidate = PathBuf::from(file_name);
    if candidate.is_absolute() {
        return candidate;
    }
    match data_path.parent() {
        Some(parent) => parent.join(candidate),
        None => candidate,
    }
}

/// Write the export artifact to `path`, replacing any previous export
pub fn write_export(table: &ScoreTable, path: &Path) -> Result<(), ScoreError> {
    let bytes = export_csv(table)?;
    let mut file = AtomicWriteFile::open(path).map_err(|e| ScoreError::write(path, e))?;
    file.write_all(&bytes).map_err(|e| ScoreError::write(path, e))?;
    file.commit().map_err(|e| ScoreError::write(path, e))?;
    tracing::info!(path = %path.display(), rows = table.len(), "exported score table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StudentRecord;
    use tempfile::TempDir;

    fn sample_table() -> ScoreTable {
        ScoreTable::from_records(vec![
            StudentRecord::new("001", "Mei", 88, 92, 76),
            StudentRecord::new("002", "Bo", 50, 60, 70),
        ])
    }

    #[test]
    fn test_export_starts_with_bom() {
        let bytes = export_csv(&sample_table()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_export_includes_total_column() {
        let bytes = export_csv(&sample_table()).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "student_id,name,chinese,math,english,total");
        assert_eq!(lines[1], "001,Mei,88,92,76,256");
        assert_eq!(lines[2], "002,Bo,50,60,70,180");
    }

    #[test]
    fn test_export_empty_table_has_header_only() {
        let bytes = export_csv(&ScoreTable::new()).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_resolve_export_path() {
        let data = Path::new("/data/class/student_scores.csv");
        assert_eq!(
            resolve_export_path(data, "export.csv"),
            PathBuf::from("/data/class/export.csv")
        );
        assert_eq!(
            resolve_export_path(data, "/tmp/out.csv"),
            PathBuf::from("/tmp/out.csv")
        );
    }

    #[test]
    fn test_write_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        write_export(&sample_table(), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, export_csv(&sample_table()).unwrap());
    }
}
