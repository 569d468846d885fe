use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::metrics::{radar_profile, round1, weakest_subject_band, Band, ClassSummary};
use crate::store::StudentRecord;

/// Shown wherever an aggregate would be computed over an empty table
pub const EMPTY_TABLE_HINT: &str = "No students yet. Add the first student's scores to get started.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading
    #[default]
    Table,
    /// Tab-separated values for scripting
    Tsv,
    /// JSON array / object
    Json,
}

/// A record with its derived total, as emitted by `--format json`
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    pub student_id: &'a str,
    pub name: &'a str,
    pub chinese: u8,
    pub math: u8,
    pub english: u8,
    pub total: u16,
}

impl<'a> From<&'a StudentRecord> for RecordView<'a> {
    fn from(record: &'a StudentRecord) -> Self {
        Self {
            student_id: &record.student_id,
            name: &record.name,
            chinese: record.chinese,
            math: record.math,
            english: record.english,
            total: record.total(),
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad by char count so CJK names line up as well as ASCII ones do
fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Format records as a ranked or listed table.
/// Columns: index, ID, name, three subjects, total
pub fn format_record_table(records: &[&StudentRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return EMPTY_TABLE_HINT.to_string();
    }

    let id_width = records
        .iter()
        .map(|r| r.student_id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    // index(4) + id + 2 + scores 4*8
    let fixed_width = 4 + id_width + 2 + 32;
    let name_limit = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => width - fixed_width,
        Some(_) => 10,
        None => usize::MAX,
    };
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, name_limit.max(4));

    let header = format!(
        "{:>3} {}  {}  {:>7} {:>7} {:>7} {:>7}",
        "#",
        pad_right("ID", id_width),
        pad_right("Name", name_width),
        "Chinese",
        "Math",
        "English",
        "Total"
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (idx, record) in records.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = pad_right(&truncate_text(&record.name, name_width), name_width);
        let scores = format!(
            "{:>7} {:>7} {:>7}",
            record.chinese, record.math, record.english
        );
        let total = format!("{:>7}", record.total());

        let line = if use_colors {
            format!(
                "{} {}  {}  {} {}",
                index_str.dimmed(),
                pad_right(&record.student_id, id_width).cyan(),
                name,
                scores,
                total.bold()
            )
        } else {
            format!(
                "{} {}  {}  {} {}",
                index_str,
                pad_right(&record.student_id, id_width),
                name,
                scores,
                total
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format records as tab-separated values for scripting
/// Columns: student_id, name, chinese, math, english, total (no headers, no colors)
pub fn format_records_tsv(records: &[&StudentRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                r.student_id,
                r.name,
                r.chinese,
                r.math,
                r.english,
                r.total()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_records_json(records: &[&StudentRecord]) -> serde_json::Result<String> {
    let views: Vec<RecordView> = records.iter().map(|r| RecordView::from(*r)).collect();
    serde_json::to_string_pretty(&views)
}

/// Format the class overview: head count and averages to one decimal
pub fn format_summary(summary: &ClassSummary, use_colors: bool) -> String {
    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!("{} {}", "Students:".bold(), summary.student_count));
    } else {
        lines.push(format!("Students: {}", summary.student_count));
    }
    for avg in &summary.averages {
        let label = format!("{} average:", avg.subject.label());
        let value = format!("{:.1}", round1(avg.average));
        if use_colors {
            lines.push(format!("{} {}", label.bold(), value.cyan()));
        } else {
            lines.push(format!("{} {}", label, value));
        }
    }
    lines.join("\n")
}

/// Format the class overview as tab-separated `key\tvalue` lines
pub fn format_summary_tsv(summary: &ClassSummary) -> String {
    let mut lines = vec![format!("students\t{}", summary.student_count)];
    for avg in &summary.averages {
        lines.push(format!("{}\t{:.1}", avg.subject.column(), round1(avg.average)));
    }
    lines.join("\n")
}

/// Format one student's profile: scores, radar points and commentary
pub fn format_student_detail(record: &StudentRecord, use_colors: bool) -> String {
    let profile = radar_profile(record)
        .iter()
        .map(|(subject, score)| format!("{} {}", subject.label(), score))
        .collect::<Vec<_>>()
        .join(" -> ");

    let band = weakest_subject_band(record);
    let mut out = if use_colors {
        format!(
            "{}\n  ID: {}\n  Chinese: {}\n  Math: {}\n  English: {}\n  Total: {}\n  Profile: {}",
            record.name.bold(),
            record.student_id.cyan(),
            record.chinese,
            record.math,
            record.english,
            record.total().bold(),
            profile
        )
    } else {
        format!(
            "{}\n  ID: {}\n  Chinese: {}\n  Math: {}\n  English: {}\n  Total: {}\n  Profile: {}",
            record.name,
            record.student_id,
            record.chinese,
            record.math,
            record.english,
            record.total(),
            profile
        )
    };

    if let Some(comment) = band.commentary() {
        let comment = match (band, use_colors) {
            (Band::Failing, true) => comment.red().bold().to_string(),
            (Band::BalancedExcellent, true) => comment.green().bold().to_string(),
            _ => comment.to_string(),
        };
        out.push_str(&format!("\n  {}", comment));
    }

    out
}
