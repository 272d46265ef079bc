//! Gates screen rendering
//!
//! Renders fleet-wide gate stats, the per-gate table with inline hourly
//! sparklines and an expanded hourly distribution for the selected gate.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::format::{format_number, format_percentage};
use crate::metrics::insights::{gate_fleet_stats, peak_hour};
use crate::ui::widgets::sparkline::sparkline_string;
use crate::ui::widgets::CountSparkline;

/// Renders the gates screen
pub fn render(frame: &mut Frame, app: &App) {
    if app.data.is_none() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // fleet stats
            Constraint::Min(6),    // gate table
            Constraint::Length(5), // selected gate distribution
        ])
        .split(frame.area());

    render_fleet_stats(frame, app, chunks[0]);
    render_gate_table(frame, app, chunks[1]);
    render_selected_gate(frame, app, chunks[2]);
}

fn render_fleet_stats(frame: &mut Frame, app: &App, area: Rect) {
    let gates = app.gates();
    let stats = gate_fleet_stats(gates);

    let mut spans = vec![
        Span::styled(
            " Puertas de embarque ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} puertas · {} vuelos · demora promedio {} min · {} a tiempo ",
                gates.len(),
                format_number(stats.total_flights as f64, 0),
                format_number(stats.avg_delay_minutes, 1),
                format_percentage(stats.avg_on_time_percentage),
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(peak) = peak_hour(gates) {
        spans.push(Span::styled(
            format!(" hora pico {:02}:00 ", peak.hour),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_gate_table(frame: &mut Frame, app: &App, area: Rect) {
    let gates = app.gates();

    let mut lines = vec![Line::from(Span::styled(
        format!(
            " {:<7} {:>7} {:>11} {:>10} {:>9}  {}",
            "Puerta", "Vuelos", "Demora", "A tiempo", "Máx", "Actividad por hora"
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    for (index, gate) in gates.iter().enumerate() {
        let style = if index == app.gates_selected {
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    " {:<7} {:>7} {:>11} {:>10} {:>9}  ",
                    gate.gate,
                    format_number(gate.total_flights as f64, 0),
                    format!("{} min", format_number(gate.avg_delay_minutes, 1)),
                    format_percentage(gate.on_time_percentage),
                    format!("{} min", format_number(gate.max_delay_minutes, 0)),
                ),
                style,
            ),
            Span::styled(
                sparkline_string(&gate.hourly_distribution()),
                style.fg(Color::Cyan),
            ),
        ]));
    }

    if gates.is_empty() {
        lines.push(Line::from(Span::styled(
            " el feed no publica análisis de puertas ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(format!(" Puertas ({}) ", gates.len()))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_selected_gate(frame: &mut Frame, app: &App, area: Rect) {
    let gates = app.gates();
    let Some(gate) = gates.get(app.gates_selected) else {
        return;
    };

    let block = Block::default()
        .title(format!(" Puerta {} — distribución horaria ", gate.gate))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < 24 {
        return;
    }

    let hours = gate.hourly_distribution();
    let max = hours.iter().copied().max().unwrap_or(0);
    let mut sparkline = CountSparkline::new(&hours, max);
    if let Some(peak) = peak_hour(gates) {
        sparkline = sparkline.highlight(peak.hour);
    }
    frame.render_widget(
        sparkline,
        Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(1), 1),
    );

    // Hour axis under the sparkline
    let axis = Line::from(Span::styled(
        " 00    06    12    18    23",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(axis),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );
}
