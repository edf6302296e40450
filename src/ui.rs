//! Terminal UI rendering for the post-run browser.
//!
//! All drawing logic lives here, separated from browser state ([`App`]) and
//! input handling ([`crate::input`]).
//!
//! * Sources view: one line per updated source, then the status bar.
//! * Items view: the selected source's new items on top, the selected item's
//!   details below, then the status bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, View};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match app.view {
        View::Sources => draw_sources(app, frame, main_area),
        View::Items => {
            let [list_area, detail_area] =
                Layout::vertical([Constraint::Percentage(50), Constraint::Min(3)])
                    .areas(main_area);
            draw_items(app, frame, list_area);
            draw_detail(app, frame, detail_area);
        }
    }
    draw_status_bar(app, frame, status_area);
}

fn highlighted(list: List) -> List {
    list.highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .bg(Color::DarkGray),
    )
    .highlight_symbol("▸ ")
}

fn draw_sources(app: &mut App, frame: &mut Frame, area: Rect) {
    let rows: Vec<ListItem> = app
        .sources
        .iter()
        .map(|snapshot| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    snapshot.display_name.as_str(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", snapshot.channel_title),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{} new", snapshot.items.len()),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();

    let list = highlighted(List::new(rows))
        .block(Block::default().title(" Updated feeds ").borders(Borders::ALL));
    frame.render_stateful_widget(list, area, &mut app.source_state);
}

fn draw_items(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(source) = app.selected_source() else {
        return;
    };

    let rows: Vec<ListItem> = source
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", item.display_date()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(item.title.as_str(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let title = format!(" {} ", source.display_name);
    let list =
        highlighted(List::new(rows)).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_stateful_widget(list, area, &mut app.item_state);
}

fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::Yellow);
    let mut lines = Vec::new();

    if let Some(item) = app.selected_item() {
        lines.push(Line::from(vec![
            Span::styled("Title: ", label),
            Span::raw(item.title.as_str()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Link:  ", label),
            Span::raw(item.link.as_str()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Date:  ", label),
            Span::raw(item.display_date()),
        ]));
        if let Some(enclosure) = &item.enclosure {
            lines.push(Line::from(vec![
                Span::styled("Media: ", label),
                Span::raw(format!(
                    "{} ({}, {} bytes)",
                    enclosure.url, enclosure.mime_type, enclosure.length
                )),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw(item.description.as_str()));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Details ").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let keys = match app.view {
        View::Sources => "  q: quit  ↑/↓: scroll  Enter: open",
        View::Items => "  q: quit  ↑/↓: scroll  Esc: back",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw(keys),
    ]));
    frame.render_widget(status, area);
}
