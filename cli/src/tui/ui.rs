use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use marku_core::{Aggregate, Performance, Storage, Subject};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode, View};

pub fn draw<S: Storage>(f: &mut Frame, app: &mut App<S>) {
    let size = f.area();
    let adding = app.view == View::Calculator && app.input_mode == InputMode::Adding;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                           // Header
            Constraint::Min(1),                              // Content
            Constraint::Length(if adding { 3 } else { 0 }), // Add form
            Constraint::Length(1),                           // Footer/Help
        ])
        .split(size);

    let title = match app.view {
        View::Calculator => "MARKU - Grade Calculator",
        View::Results => "MARKU - Results",
    };
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    match app.view {
        View::Calculator => draw_calculator(f, app, main_chunks[1]),
        View::Results => draw_results(f, app, main_chunks[1]),
    }

    if adding {
        draw_input(f, app, main_chunks[2]);
    }

    draw_footer(f, app, main_chunks[3]);

    if let Some(confirm) = &app.confirm {
        draw_popup(f, " Confirm ", &format!("{}\n\ny: yes   any other key: no", confirm.question()), Color::Yellow);
    }
    if let Some(alert) = &app.alert {
        draw_popup(f, &format!(" {} ", alert.title), &format!("{}\n\npress any key", alert.message), Color::Red);
    }
}

fn draw_calculator<S: Storage>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    if app.store.is_empty() {
        let empty = Paragraph::new("No subjects added yet.\n\nPress 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().title(" Subjects ").borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(empty, chunks[0]);
    } else {
        let table = subject_table(app.store.subjects())
            .block(Block::default().title(" Subjects ").borders(Borders::ALL).border_type(BorderType::Rounded))
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[0], &mut app.state);
    }

    let summary = app.store.summary();
    let panel = Paragraph::new(summary_lines(&summary, app.store.is_empty()))
        .block(Block::default().title(" Live Results ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, chunks[1]);
}

fn draw_results<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(snapshot) = &app.snapshot else {
        let empty = Paragraph::new("No Data Available\n\nNo subjects have been added yet. Go back and add some.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Cards
            Constraint::Length(4), // Assessment
            Constraint::Min(3),    // Table
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let values = [
        (" SGPA ", format!("{:.2}", snapshot.sgpa)),
        (" CGPA ", format!("{:.2}", snapshot.cgpa)),
        (" Percentage ", format!("{:.2}%", snapshot.percentage)),
    ];
    for ((title, value), area) in values.iter().zip(cards.iter()) {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(value.as_str(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().title(*title).borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(card, *area);
    }

    let performance = snapshot.performance();
    let assessment = Paragraph::new(vec![
        Line::from(Span::styled(
            performance.label(),
            Style::default().fg(performance_color(performance)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Total Credits: {}   Total Grade Points: {}",
                snapshot.total_credits, snapshot.total_grade_points
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title(" Performance Assessment ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(assessment, chunks[1]);

    let table = subject_table(&snapshot.subjects)
        .block(Block::default().title(" Subjects ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(table, chunks[2]);
}

fn subject_table(subjects: &[Subject]) -> Table<'_> {
    let rows: Vec<Row> = subjects
        .iter()
        .map(|s| {
            Row::new(vec![
                Span::styled(s.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(s.credits.to_string()),
                Span::raw(format!("{} ({})", s.grade_letter, s.grade)),
                Span::raw(s.grade_points.to_string()),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Min(12),    // Subject
            Constraint::Length(8),  // Credits
            Constraint::Length(9),  // Grade
            Constraint::Length(13), // Grade Points
        ],
    )
    .header(Row::new(vec!["Subject", "Credits", "Grade", "Grade Points"]).style(Style::default().fg(Color::Yellow)))
}

fn summary_lines(summary: &Aggregate, empty: bool) -> Vec<Line<'static>> {
    let rounded = summary.rounded();
    let mut lines = vec![
        value_line("SGPA:       ", format!("{:.2}", rounded.sgpa)),
        value_line("CGPA:       ", format!("{:.2}", rounded.cgpa)),
        value_line("Percentage: ", format!("{:.2}%", rounded.percentage)),
        Line::from(""),
        value_line("Credits:    ", rounded.total_credits.to_string()),
        value_line("Points:     ", rounded.total_grade_points.to_string()),
        Line::from(""),
    ];
    if empty {
        lines.push(Line::from(Span::styled(
            "Add a subject to calculate.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            summary.performance().label(),
            Style::default().fg(performance_color(summary.performance())),
        )));
    }
    lines
}

fn value_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Blue)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn performance_color(performance: Performance) -> Color {
    match performance {
        Performance::Excellent => Color::Green,
        Performance::VeryGood => Color::Cyan,
        Performance::Good => Color::Yellow,
        Performance::Satisfactory => Color::LightRed,
        Performance::NeedsImprovement => Color::Red,
        Performance::Critical => Color::Magenta,
    }
}

fn draw_input<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .block(
            Block::default()
                .title(" Add subject: Name credits:N grade:N ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(input, area);

    if app.alert.is_none() {
        let before_cursor = &app.input[..app.byte_index(app.cursor_position)];
        let x = area.x + 1 + before_cursor.width() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_footer<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let footer = if let Some(n) = &app.notification {
        Paragraph::new(n.message.as_str()).style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        let help = match (app.view, app.input_mode) {
            (View::Calculator, InputMode::Adding) => "Enter: Add | Esc: Cancel",
            (View::Calculator, InputMode::Normal) => {
                "a: Add | d: Remove | C: Clear all | c/Enter: Calculate | r: Last results | j/k: Navigate | q: Quit"
            }
            (View::Results, _) => "p: Print | e: Export CSV | t: Export text | C: Clear all | Esc: Back | q: Quit",
        };
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(footer.alignment(Alignment::Center), area);
}

fn draw_popup(f: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(50, 30, f.area());
    let popup = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 30, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 12);
        assert!(inner.x >= 25 && inner.y >= 14);
    }
}
