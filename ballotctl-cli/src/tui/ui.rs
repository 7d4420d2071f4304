//! UI rendering using ratatui

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use crate::render::ballot_line;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Failure color
const FAILURE: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Header + content + status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Session header
            Constraint::Min(5),    // Ballots
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    if app.show_detail {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        render_list(frame, app, content[0]);
        render_detail(frame, app, content[1]);
    } else {
        render_list(frame, app, chunks[1]);
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let address = if app.session.address.is_empty() {
        Span::styled("(no address)", Style::default().fg(DIM))
    } else {
        Span::styled(app.session.address.to_string(), Style::default().fg(Color::White))
    };
    let contract = match app.session.contract {
        Some(ref handle) => Span::styled(handle.id().to_string(), Style::default().fg(SUCCESS)),
        None => Span::styled("not connected", Style::default().fg(HIGHLIGHT)),
    };

    let line = Line::from(vec![
        Span::styled("address ", Style::default().fg(SECONDARY)),
        address,
        Span::raw("   "),
        Span::styled("contract ", Style::default().fg(SECONDARY)),
        contract,
    ]);

    let block = Block::default()
        .title(format!(" {} ({}) ", app.props.title, app.props.campaigns.len()))
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the ballot list
fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Ballots ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    let visible_height = inner.height as usize;
    app.scroll_into_view(visible_height);

    let items: Vec<ListItem> = app
        .props
        .campaigns
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_height)
        .map(|(idx, record)| {
            let style = if idx == app.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(ballot_line(record), style)))
        })
        .collect();

    let list = if items.is_empty() {
        let placeholder = if app.props.is_loading {
            "  Loading..."
        } else {
            "  No ballots yet"
        };
        List::new(vec![ListItem::new(Line::from(Span::styled(
            placeholder,
            Style::default().fg(DIM),
        )))])
        .block(block)
    } else {
        List::new(items).block(block)
    };

    frame.render_widget(list, area);

    // Scroll indicator
    let total = app.props.campaigns.len();
    if total > visible_height {
        let indicator = format!(" {}/{} ", app.selected_index + 1, total);
        let indicator_area = Rect {
            x: area.x + area.width.saturating_sub(indicator.len() as u16 + 2),
            y: area.y,
            width: (indicator.len() as u16 + 2).min(area.width),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(indicator).style(Style::default().fg(DIM)),
            indicator_area,
        );
    }
}

/// Render the selected ballot as pretty JSON
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .title_style(Style::default().fg(SECONDARY))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    let content = match app.selected_ballot() {
        Some(record) => Text::from(
            serde_json::to_string_pretty(record.value())
                .unwrap_or_else(|_| record.value().to_string()),
        ),
        None => Text::from(Span::styled("Select a ballot", Style::default().fg(DIM))),
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let indicator = if app.props.is_loading {
        Span::styled(" LOADING ", Style::default().bg(HIGHLIGHT).fg(Color::Black))
    } else if app.props.error.is_some() {
        Span::styled(" ERROR ", Style::default().bg(FAILURE).fg(Color::Black))
    } else {
        Span::styled(" READY ", Style::default().bg(ACCENT).fg(Color::Black))
    };

    let mut spans = vec![indicator, Span::raw(" ")];

    if let Some(ref error) = app.props.error {
        spans.push(Span::styled(error.to_string(), Style::default().fg(FAILURE)));
        spans.push(Span::raw("  "));
    } else if let Some(ref msg) = app.status_message {
        spans.push(Span::styled(msg.clone(), Style::default().fg(HIGHLIGHT)));
        spans.push(Span::raw("  "));
    }

    spans.push(Span::styled(
        "j/k:nav  r:refresh  n:next address  c:contract  p:detail  q:quit",
        Style::default().fg(DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
