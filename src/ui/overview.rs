//! Overview screen rendering
//!
//! Renders the headline KPI cards, the airline punctuality ranking, the
//! delay-bucket distribution, the daily trend and the derived insights.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::format::{format_date_short, format_number, format_percentage};
use crate::metrics::insights::{
    best_gate, bucket_total, hours_lost, peak_hour, sorted_daily, trend_axis, worst_delay,
};
use crate::metrics::routes::airline_rankings;
use crate::metrics::tops::{top_destinations, top_destinations_from_routes, top_earlies};
use crate::ui::widgets::sparkline::sparkline_string;

/// How many airlines the ranking panel shows
const RANKING_LIMIT: usize = 8;

/// Width of the inline percentage bars, in cells
const BAR_WIDTH: usize = 10;

/// Color for a delay value in minutes (green = early, red = bad)
fn delay_color(minutes: f64) -> Color {
    if minutes < 0.0 {
        Color::Green
    } else if minutes < 15.0 {
        Color::Cyan
    } else if minutes < 30.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Color for an on-time percentage
fn on_time_color(percentage: f64) -> Color {
    if percentage >= 80.0 {
        Color::Green
    } else if percentage >= 60.0 {
        Color::Cyan
    } else if percentage >= 40.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Display name for a delay bucket
fn bucket_label(bucket: &str) -> &str {
    match bucket {
        "cancelled" => "Cancelados",
        "delay_over_45" => "+45 min",
        "delay_45_30" => "30-45 min",
        "delay_30_15" => "15-30 min",
        "delay_15_0" => "0-15 min",
        "on_time_or_early" => "A tiempo",
        other => other,
    }
}

/// A proportional bar like `███████░░░` for a 0-100 value
fn bar_string(percentage: f64) -> String {
    let filled = ((percentage / 100.0 * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(BAR_WIDTH - filled));
    bar
}

/// Renders the overview screen
pub fn render(frame: &mut Frame, app: &App) {
    let Some(data) = app.data.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // header
            Constraint::Length(5),  // KPI cards
            Constraint::Min(8),     // rankings + buckets
            Constraint::Length(4),  // daily trend
            Constraint::Length(7),  // insights
        ])
        .split(frame.area());

    // Header
    let mut header_spans = vec![
        Span::styled(
            " Demoras en vuelos — Argentina ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " ventana de {} días · datos del {} ",
                data.headline.lookback_days,
                data.generated_at.format("%d/%m/%Y %H:%M UTC")
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.data_is_stale() {
        header_spans.push(Span::styled(
            " [datos vencidos — r para actualizar] ",
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header_spans)), chunks[0]);

    render_kpi_cards(frame, app, chunks[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(42),
            Constraint::Percentage(30),
            Constraint::Percentage(28),
        ])
        .split(chunks[2]);
    render_airline_ranking(frame, app, middle[0]);
    render_buckets(frame, app, middle[1]);
    render_destinations(frame, app, middle[2]);

    render_trend(frame, app, chunks[3]);
    render_insights(frame, app, chunks[4]);
}

fn render_kpi_cards(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };
    let headline = &data.headline;

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let card = |title: &str, value: String, color: Color| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                title.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    };

    frame.render_widget(
        card(
            "Vuelos totales",
            format_number(headline.total_flights as f64, 0),
            Color::Cyan,
        ),
        cards[0],
    );
    frame.render_widget(
        card(
            "Demora promedio",
            format!("{} min", format_number(headline.avg_delay_minutes, 1)),
            delay_color(headline.avg_delay_minutes),
        ),
        cards[1],
    );
    frame.render_widget(
        card(
            "Cancelados",
            format_number(headline.cancelled_flights as f64, 0),
            Color::Red,
        ),
        cards[2],
    );
    frame.render_widget(
        card(
            "Demorados +45 min",
            format_number(headline.delayed_over_45min as f64, 0),
            Color::Yellow,
        ),
        cards[3],
    );
}

fn render_airline_ranking(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };

    let standings = airline_rankings(&data.routes, RANKING_LIMIT);
    let mut lines = Vec::new();
    for standing in &standings {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<3}", standing.code),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!("{:<22}", truncate(&standing.name, 22))),
            Span::styled(
                bar_string(standing.on_time_percentage),
                Style::default().fg(on_time_color(standing.on_time_percentage)),
            ),
            Span::raw(format!(
                " {:>6}  {} vuelos",
                format_percentage(standing.on_time_percentage),
                format_number(standing.total_flights as f64, 0)
            )),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " sin datos de rutas ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(" Puntualidad por aerolínea ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_buckets(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };

    let total = bucket_total(&data.buckets);
    let mut lines = Vec::new();
    for bucket in &data.buckets {
        let share = if total > 0 {
            bucket.total_flights as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {:<11}", bucket_label(&bucket.bucket))),
            Span::styled(bar_string(share), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " {:>7}  {}",
                format_number(bucket.total_flights as f64, 0),
                format_percentage(share)
            )),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " sin distribución de demoras ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(" Distribución de demoras ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_destinations(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };

    // The tops export is authoritative; derive from routes when it carries
    // no destination rows
    let mut destinations = top_destinations(&data.tops);
    if destinations.is_empty() {
        destinations = top_destinations_from_routes(&data.routes, 10);
    }

    let mut lines = Vec::new();
    for destination in &destinations {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:>2}. ", destination.rank),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(
                "{:<14}",
                truncate(&destination.destination_city, 14)
            )),
            Span::styled(
                format!(
                    "{:>7} · {} min",
                    format_number(destination.total_flights as f64, 0),
                    format_number(destination.avg_delay_minutes, 0)
                ),
                Style::default().fg(delay_color(destination.avg_delay_minutes)),
            ),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " sin destinos ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(" Destinos principales ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_trend(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };

    let days = sorted_daily(&data.daily_status);
    let mut lines = Vec::new();
    if let (Some(axis), Some(first), Some(last)) = (
        trend_axis(&data.daily_status),
        days.first(),
        days.last(),
    ) {
        let counts: Vec<u64> = days
            .iter()
            .map(|day| day.avg_delay_minutes.max(0.0).round() as u64)
            .collect();
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(sparkline_string(&counts), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "  {} → {} · promedio {} min",
                    format_date_short(first.flight_date),
                    format_date_short(last.flight_date),
                    format_number(axis.avg, 1)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            " sin serie diaria ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(" Tendencia diaria (demora promedio) ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_insights(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(data) = app.data.as_ref() else { return };

    let mut lines = Vec::new();

    if let Some(peak) = peak_hour(&data.gates) {
        lines.push(Line::from(vec![
            Span::styled(" Hora pico      ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{:02}:00 hs, {} vuelos coordinados en esa franja",
                peak.hour,
                format_number(peak.flights as f64, 0)
            )),
        ]));
    }

    if let Some(worst) = worst_delay(&data.tops) {
        let flight = worst.flight_number.as_deref().unwrap_or("?");
        let city = worst.destination_city.as_deref().unwrap_or("?");
        lines.push(Line::from(vec![
            Span::styled(" Máxima demora  ", Style::default().fg(Color::Red)),
            Span::raw(format!(
                "vuelo {} a {}: {} min sobre horario",
                flight,
                city,
                format_number(worst.delay_minutes.unwrap_or(0.0), 0)
            )),
        ]));
    }

    if let Some(gate) = best_gate(&data.gates) {
        lines.push(Line::from(vec![
            Span::styled(" Puerta destacada ", Style::default().fg(Color::Green)),
            Span::raw(format!(
                "puerta {} con {} de puntualidad",
                gate.gate,
                format_percentage(gate.on_time_percentage)
            )),
        ]));
    }

    if let Some((total, worst)) = hours_lost(&data.airlines) {
        lines.push(Line::from(vec![
            Span::styled(" Horas perdidas ", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "{} hs acumuladas en demoras, {} es la más afectada",
                format_number(total, 0),
                worst.airline_name
            )),
        ]));
    }

    if let Some(early) = top_earlies(&data.tops).first() {
        let flight = early.flight_number.as_deref().unwrap_or("?");
        let city = early.destination_city.as_deref().unwrap_or("?");
        lines.push(Line::from(vec![
            Span::styled(" Salida anticipada ", Style::default().fg(Color::Green)),
            Span::raw(format!(
                "vuelo {} a {} partió {} min antes de horario",
                flight,
                city,
                format_number(early.delay_minutes.unwrap_or(0.0).abs(), 0)
            )),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " sin insights disponibles ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().title(" Insights ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Truncates a name to fit its column
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut truncated: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}
