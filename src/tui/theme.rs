//! Centralized theme module for TUI color constants and styles

use crate::config::ThemeMode;
use crate::metrics::Band;
use crate::store::Subject;
use ratatui::prelude::*;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Total-based colors (traffic light pattern, high is good)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,

    // One bar color per subject
    pub chinese: Color,
    pub math: Color,
    pub english: Color,

    // Radar chart
    pub radar_line: Color,
    pub radar_grid: Color,

    // Band commentary
    pub band_failing: Color,
    pub band_excellent: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub card_value: Style,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,
    pub flash_info: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub field_focused: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            chinese: Color::Red,
            math: Color::Cyan,
            english: Color::Magenta,
            radar_line: Color::Cyan,
            radar_grid: Color::DarkGray,
            band_failing: Color::Red,
            band_excellent: Color::Green,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            card_value: Style::new().fg(Color::White).bold(),
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            flash_info: Color::White,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            field_focused: Style::new().fg(Color::Black).bg(Color::Cyan),
        }
    }

    pub fn light() -> Self {
        Self {
            score_high: Color::Rgb(0, 128, 0),
            score_mid: Color::Rgb(170, 110, 0),
            score_low: Color::Rgb(180, 0, 0),
            chinese: Color::Rgb(200, 40, 40),
            math: Color::Rgb(0, 110, 160),
            english: Color::Rgb(140, 40, 160),
            radar_line: Color::Blue,
            radar_grid: Color::Gray,
            band_failing: Color::Rgb(180, 0, 0),
            band_excellent: Color::Rgb(0, 128, 0),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            card_value: Style::new().fg(Color::Black).bold(),
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(180, 0, 0),
            flash_info: Color::Black,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            field_focused: Style::new().fg(Color::White).bg(Color::Blue),
        }
    }

    pub fn subject_color(&self, subject: Subject) -> Color {
        match subject {
            Subject::Chinese => self.chinese,
            Subject::Math => self.math,
            Subject::English => self.english,
        }
    }

    pub fn band_color(&self, band: Band) -> Option<Color> {
        match band {
            Band::Failing => Some(self.band_failing),
            Band::BalancedExcellent => Some(self.band_excellent),
            Band::Normal => None,
        }
    }

    /// Returns the appropriate color for a total based on its percentage of max total
    pub fn score_color(&self, score: f64, max_score: f64) -> Color {
        let percentage = if max_score > 0.0 {
            (score / max_score) * 100.0
        } else {
            0.0
        };

        if percentage >= 90.0 {
            self.score_high
        } else if percentage >= 60.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

/// Pick a palette. `auto` asks the terminal for its background luminance
/// and falls back to dark when it doesn't answer.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!(error = %e, "terminal background unknown, using dark theme");
                ThemeColors::dark()
            }
        },
    }
}
