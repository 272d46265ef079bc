//! Routes screen rendering
//!
//! Renders the filter bar, the filtered routes table and a totals row
//! recomputed from the visible rows.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::RouteMetric;
use crate::format::{format_number, format_percentage};
use crate::metrics::routes::{aggregate_routes, unique_airlines, unique_origins};

/// Renders the routes screen
pub fn render(frame: &mut Frame, app: &App) {
    if app.data.is_none() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // filter bar
            Constraint::Min(6),    // table
            Constraint::Length(3), // totals
        ])
        .split(frame.area());

    render_filter_bar(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_totals(frame, app, chunks[2]);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let filter = &app.filter;

    // Expand codes with the airport city / airline name for the bar
    let origin_display = filter.origin.as_ref().map(|code| {
        let routes = app.data.as_ref().map(|d| d.routes.as_slice()).unwrap_or(&[]);
        match unique_origins(routes).into_iter().find(|o| &o.code == code) {
            Some(origin) => format!("{} ({})", origin.code, origin.city),
            None => code.clone(),
        }
    });
    let airline_display = filter.airline.as_ref().map(|code| {
        let routes = app.data.as_ref().map(|d| d.routes.as_slice()).unwrap_or(&[]);
        match unique_airlines(routes, None, None, None)
            .into_iter()
            .find(|a| &a.code == code)
        {
            Some(airline) => format!("{} ({})", airline.code, airline.name),
            None => code.clone(),
        }
    });

    let segment = |label: &str, value: Option<String>| {
        let color = if value.is_some() {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::Cyan)),
            Span::styled(
                value.unwrap_or_else(|| "Todos".to_string()),
                Style::default().fg(color),
            ),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(segment("Origen", origin_display));
    spans.extend(segment("País", filter.country.clone()));
    spans.extend(segment("Ciudad", filter.city.clone()));
    spans.extend(segment("Aerolínea", airline_display));
    spans.push(Span::styled(
        "   (o/c/i/a cambiar · x limpiar)",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn route_line(route: &RouteMetric, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![Span::styled(
        format!(
            " {:<3}→{:<3} {:<18} {:<3} {:>7} {:>9} {:>10} {:>7}",
            route.origin_airport_code,
            route.destination_airport_code,
            truncate(&route.destination_city, 18),
            route.airline_code,
            format_number(route.total_flights as f64, 0),
            format_percentage(route.on_time_percentage),
            format!("{} min", format_number(route.avg_delay_minutes, 1)),
            format_number(route.total_cancelled_flights as f64, 0),
        ),
        style,
    )])
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let routes = app.visible_routes();

    let mut lines = vec![Line::from(Span::styled(
        format!(
            " {:<7} {:<18} {:<3} {:>7} {:>9} {:>10} {:>7}",
            "Ruta", "Destino", "Cía", "Vuelos", "A tiempo", "Demora", "Cancel"
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    // Keep the selected row visible in the available height
    let visible_rows = area.height.saturating_sub(3) as usize;
    let scroll = app.routes_selected.saturating_sub(visible_rows.saturating_sub(1));
    for (index, route) in routes
        .iter()
        .copied()
        .enumerate()
        .skip(scroll)
        .take(visible_rows.max(1))
    {
        lines.push(route_line(route, index == app.routes_selected));
    }

    if routes.is_empty() {
        lines.push(Line::from(Span::styled(
            " sin rutas para los filtros activos ",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if app.filter.is_active() {
        format!(" Rutas ({}) [filtrado] ", routes.len())
    } else {
        format!(" Rutas ({}) ", routes.len())
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_totals(frame: &mut Frame, app: &App, area: Rect) {
    let routes = app.visible_routes();
    let totals = aggregate_routes(routes.iter().copied());

    let line = Line::from(vec![
        Span::styled(" Totales: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "{} vuelos · {} a tiempo · demora promedio {} min · {} cancelados ({})",
            format_number(totals.total_flights as f64, 0),
            format_percentage(totals.on_time_percentage()),
            format_number(totals.avg_delay_minutes, 1),
            format_number(totals.total_cancelled as f64, 0),
            format_percentage(totals.cancellation_rate()),
        )),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut truncated: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}
