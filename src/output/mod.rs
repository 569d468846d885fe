pub mod formatter;

pub use formatter::{
    format_record_table, format_records_json, format_records_tsv, format_student_detail,
    format_summary, format_summary_tsv, should_use_colors, OutputFormat, RecordView,
    EMPTY_TABLE_HINT,
};
