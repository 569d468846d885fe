use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Cell, Clear, Paragraph, Row, Table, Tabs};
use crate::metrics::{class_summary, radar_profile, round1, top_n, weakest_subject_band};
use crate::output::EMPTY_TABLE_HINT;
use crate::store::{StudentRecord, Subject};
use crate::tui::app::{App, Field, FlashKind, InputMode, View};

const APP_TITLE: &str = "Class Scores";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Length(1),  // Tab bar
        Constraint::Fill(1),    // Current view
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Overview => render_overview(frame, chunks[2], app),
        View::Profile => render_profile(frame, chunks[2], app),
        View::Data => render_data_table(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Entry => render_entry_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(APP_TITLE, Style::default().fg(app.theme.title_color).bold())];

    // Data file on the right
    let path_text = app.session.store().path().display().to_string();
    let padding_len = (area.width as usize).saturating_sub(APP_TITLE.len() + path_text.chars().count());
    if padding_len > 0 {
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(path_text, Style::default().fg(app.theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| format!("{} {}", i + 1, view.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_empty_hint(frame: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(EMPTY_TABLE_HINT, Style::default().fg(app.theme.muted))),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("a", Style::default().fg(app.theme.status_key_color).bold()),
            Span::raw(" to add a student."),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let table = app.table();
    let summary = match class_summary(table) {
        Ok(summary) => summary,
        Err(_) => {
            render_empty_hint(frame, area, app);
            return;
        }
    };

    let chunks = Layout::vertical([
        Constraint::Length(3),  // Metric cards
        Constraint::Fill(1),    // Charts
    ])
    .split(area);

    // Four cards: head count plus one per subject
    let mut cards = vec![("Students".to_string(), summary.student_count.to_string())];
    for avg in &summary.averages {
        cards.push((
            format!("{} avg", avg.subject.label()),
            format!("{:.1}", round1(avg.average)),
        ));
    }
    let card_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(chunks[0]);
    for ((label, value), card_area) in cards.into_iter().zip(card_areas.iter()) {
        let card = Paragraph::new(Span::styled(value, app.theme.card_value))
            .alignment(Alignment::Center)
            .block(Block::bordered().title(label).border_style(Style::default().fg(app.theme.muted)));
        frame.render_widget(card, *card_area);
    }

    let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    // Subject averages
    let average_bars: Vec<Bar> = summary
        .averages
        .iter()
        .map(|avg| {
            Bar::default()
                .value(avg.average.round() as u64)
                .text_value(format!("{:.1}", round1(avg.average)))
                .label(Line::from(avg.subject.label()))
                .style(Style::default().fg(app.theme.subject_color(avg.subject)))
        })
        .collect();
    let average_chart = BarChart::default()
        .block(Block::bordered().title(" Subject averages "))
        .data(BarGroup::default().bars(&average_bars))
        .bar_width(9)
        .bar_gap(3)
        .max(100);
    frame.render_widget(average_chart, charts[0]);

    // Top-N totals
    let limit = app.config.top_n();
    let ranked = top_n(table, limit).unwrap_or_default();
    let max_total = ranked.first().map(|r| f64::from(r.total())).unwrap_or(0.0);
    let top_bars: Vec<Bar> = ranked
        .iter()
        .map(|record| {
            let total = f64::from(record.total());
            Bar::default()
                .value(u64::from(record.total()))
                .label(Line::from(record.name.clone()))
                .style(Style::default().fg(app.theme.score_color(total, max_total)))
        })
        .collect();
    let top_chart = BarChart::default()
        .block(Block::bordered().title(format!(" Top {} by total ", limit)))
        .data(BarGroup::default().bars(&top_bars))
        .bar_width(7)
        .bar_gap(2)
        .max(300);
    frame.render_widget(top_chart, charts[1]);
}

fn render_profile(frame: &mut Frame, area: Rect, app: &App) {
    if app.table().is_empty() {
        render_empty_hint(frame, area, app);
        return;
    }

    let columns = Layout::horizontal([
        Constraint::Length(24),  // Student picker
        Constraint::Fill(1),     // Profile
    ])
    .split(area);

    // Student picker
    let names = app.table().names();
    let items: Vec<Line> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == app.profile_index {
                Line::from(Span::styled(format!("> {}", name), app.theme.row_selected))
            } else {
                Line::from(format!("  {}", name))
            }
        })
        .collect();
    // Keep the selection visible in long classes
    let visible = columns[0].height.saturating_sub(2) as usize;
    let scroll = app.profile_index.saturating_sub(visible.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(items)
            .scroll((scroll as u16, 0))
            .block(Block::bordered().title(" Students ")),
        columns[0],
    );

    let record = match app.selected_profile() {
        Some(record) => record,
        None => return,
    };

    let rows = Layout::vertical([
        Constraint::Length(2),  // ID and scores
        Constraint::Fill(1),    // Radar chart
        Constraint::Length(1),  // Commentary
    ])
    .split(columns[1]);

    let key = Style::default().fg(app.theme.muted);
    let mut info = vec![
        Span::styled("ID: ", key),
        Span::styled(record.student_id.clone(), Style::default().bold()),
    ];
    for subject in Subject::ALL {
        info.push(Span::styled(format!("   {}: ", subject.label()), key));
        info.push(Span::styled(
            record.score(subject).to_string(),
            Style::default().fg(app.theme.subject_color(subject)).bold(),
        ));
    }
    info.push(Span::styled("   Total: ", key));
    info.push(Span::styled(record.total().to_string(), Style::default().bold()));
    frame.render_widget(Paragraph::new(Line::from(info)), rows[0]);

    render_radar(frame, rows[1], app, record);

    let band = weakest_subject_band(record);
    if let (Some(comment), Some(color)) = (band.commentary(), app.theme.band_color(band)) {
        frame.render_widget(
            Paragraph::new(Span::styled(comment, Style::default().fg(color).bold())),
            rows[2],
        );
    }
}

/// Point on the radar for the i-th of three axes, first axis pointing up
fn radar_point(axis: usize, radius: f64) -> (f64, f64) {
    let angle = std::f64::consts::FRAC_PI_2 - (axis as f64) * 2.0 * std::f64::consts::PI / 3.0;
    (radius * angle.cos(), radius * angle.sin())
}

fn draw_triangle(ctx: &mut Context, radius: f64, color: Color) {
    for axis in 0..3 {
        let (x1, y1) = radar_point(axis, radius);
        let (x2, y2) = radar_point((axis + 1) % 3, radius);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
    }
}

fn render_radar(frame: &mut Frame, area: Rect, app: &App, record: &StudentRecord) {
    let profile = radar_profile(record);
    let grid = app.theme.radar_grid;
    let line = app.theme.radar_line;
    let label_style = Style::default().fg(app.theme.muted);

    let canvas = Canvas::default()
        .block(Block::bordered().title(" Subject radar "))
        .marker(Marker::Braille)
        .x_bounds([-130.0, 130.0])
        .y_bounds([-80.0, 120.0])
        .paint(move |ctx| {
            // Grid rings and axes on the 0..100 scale
            for ring in [25.0, 50.0, 75.0, 100.0] {
                draw_triangle(ctx, ring, grid);
            }
            for axis in 0..3 {
                let (x, y) = radar_point(axis, 100.0);
                ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, grid));
            }
            ctx.layer();

            // Consecutive profile points; the last pair closes the polygon
            for (axis, pair) in profile.windows(2).enumerate() {
                let (x1, y1) = radar_point(axis, f64::from(pair[0].1));
                let (x2, y2) = radar_point((axis + 1) % 3, f64::from(pair[1].1));
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, line));
            }

            for (axis, (subject, score)) in profile.iter().take(3).enumerate() {
                let (x, y) = radar_point(axis, 108.0);
                let text = format!("{} {}", subject.label(), score);
                let x = if axis == 0 { x - 10.0 } else { x };
                ctx.print(x, y, Span::styled(text, label_style));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_data_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.table().is_empty() {
        render_empty_hint(frame, area, app);
        return;
    }

    let theme = app.theme.clone();
    let max_total = app
        .table()
        .iter()
        .map(|r| f64::from(r.total()))
        .fold(0.0_f64, f64::max);

    let rows: Vec<Row> = app
        .table()
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };
            let total = f64::from(record.total());

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(record.student_id.clone()),
                Cell::from(record.name.clone()),
                Cell::from(format!("{:>7}", record.chinese)),
                Cell::from(format!("{:>7}", record.math)),
                Cell::from(format!("{:>7}", record.english)),
                Cell::from(format!("{:>5}", record.total()))
                    .style(Style::default().fg(theme.score_color(total, max_total)).bold()),
            ])
            .style(row_style)
        })
        .collect();

    // Column widths
    let widths = [
        Constraint::Length(4),   // Index: "99."
        Constraint::Length(12),  // Student ID
        Constraint::Fill(1),     // Name
        Constraint::Length(7),   // Chinese
        Constraint::Length(7),   // Math
        Constraint::Length(7),   // English
        Constraint::Length(5),   // Total
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "ID", "Name", "Chinese", "   Math", "English", "Total"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let msg_color = match kind {
            FlashKind::Success => app.theme.flash_success,
            FlashKind::Error => app.theme.flash_error,
            FlashKind::Info => app.theme.flash_info,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} students", app.table().len());

        // Build hints with colored shortcut keys
        let mut hints = vec![
            ("Tab", ":view "),
            ("a", ":add "),
            ("r", ":reload "),
        ];
        match app.current_view {
            View::Profile => hints.insert(1, ("j/k", ":student ")),
            View::Data => {
                hints.insert(1, ("j/k", ":nav "));
                hints.push(("e", ":export "));
            }
            View::Overview => {}
        }
        hints.push(("?", ":help "));
        hints.push(("q", ":quit"));

        let mut spans = vec![
            Span::styled(count, Style::default().fg(app.theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(app.theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the score entry form
fn render_entry_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(48, 10, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Add Student Scores ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let focused = app.entry.focused() == field;
            let value = app.entry.value(field);
            let shown = if focused {
                format!("{}|", value)
            } else {
                value.to_string()
            };
            let value_style = if focused {
                app.theme.field_focused
            } else {
                Style::default()
            };
            let hint = if field.is_score() { " (0-100)" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>11}: ", field.label()), Style::default().fg(app.theme.muted)),
                Span::styled(shown, value_style),
                Span::styled(hint, Style::default().fg(app.theme.muted)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/Up/Down: field | Enter: save | Esc: cancel",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(50, 15, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let entries = [
        ("Tab / S-Tab   ", "Next / previous tab"),
        ("1 2 3         ", "Jump to tab"),
        ("j / Down      ", "Next student or row"),
        ("k / Up        ", "Previous student or row"),
        ("a             ", "Add student scores"),
        ("e             ", "Export CSV (Data Table tab)"),
        ("r             ", "Reload scores from disk"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
