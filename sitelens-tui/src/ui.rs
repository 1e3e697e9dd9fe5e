use crate::app::{App, InputMode, Screen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
        Tabs, Wrap,
    },
};
use sitelens_client::{CrawlApi, CrawlItem, SortColumn, SortDirection};
use sitelens_core::format::{format_date, truncate};
use sitelens_core::{Level, Notification};

const FAILED_TITLE: &str = "CRAWLING DID NOT WORK.";
const MAX_TOASTS: usize = 4;

pub fn draw<A: CrawlApi>(f: &mut Frame, app: &App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Screen
            Constraint::Length(1), // Hints bar
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);
    match app.screen {
        Screen::Home => render_home(f, app, chunks[1]),
        Screen::Analytics => render_analytics(f, app, chunks[1]),
    }
    render_hints(f, app, chunks[2]);

    if app.store.detail().is_open() {
        render_detail(f, app);
    }
    render_toasts(f, app);
}

fn render_tabs<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let tabs = Tabs::new(vec![Line::from(" Home "), Line::from(" Analytics ")])
        .select(app.screen.as_index())
        .block(
            Block::default()
                .title(" Sitelens ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_home<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    render_search(f, app, chunks[0]);
    render_table(f, app, chunks[1]);
    render_pagination(f, app, chunks[2]);
}

fn render_search<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let text = app.store.query().search_text();
    let content = if text.is_empty() && !editing {
        Line::from(Span::styled(
            "Press / to search by title or URL",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(text.to_string())
    };

    let inner = block.inner(area);
    f.render_widget(Paragraph::new(content).block(block), area);

    if editing {
        f.set_cursor_position((cursor_x(inner, text), inner.y));
    }
}

fn sort_marker<A: CrawlApi>(app: &App<A>, column: SortColumn) -> &'static str {
    match app.store.query().sort().get(column) {
        Some(SortDirection::Ascending) => " ▲",
        Some(SortDirection::Descending) => " ▼",
        None => "",
    }
}

fn render_table<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let store = &app.store;
    let selection = store.selection();

    let mut title = format!(" Crawl results ({}) ", store.total_count());
    if !selection.is_empty() {
        title = format!(
            " Crawl results ({}) | {} selected - d delete, r re-analyze ",
            store.total_count(),
            selection.len()
        );
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if store.pending() || app.busy.is_some() {
        let message = app.busy.unwrap_or("Loading...");
        let loading = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    if store.items().is_empty() {
        let empty = Paragraph::new("No Items")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows = store.items().iter().map(|item| {
        let checkbox = if selection.contains(item.id) { "[x]" } else { "[ ]" };
        let (title, status, status_style) = if item.is_success() {
            (
                Cell::from(truncate(&item.page_title, 40)),
                "Success",
                Style::default().fg(Color::Green),
            )
        } else {
            (
                Cell::from(FAILED_TITLE).style(Style::default().fg(Color::Red)),
                "Failed",
                Style::default().fg(Color::Red),
            )
        };
        Row::new(vec![
            Cell::from(checkbox),
            title,
            Cell::from(item.url().unwrap_or("").to_string()),
            Cell::from(status).style(status_style),
            Cell::from(format_date(item.created_at.as_ref())),
        ])
    });

    let all_marker = if selection.is_all_checked() { "[x]" } else { "[ ]" };
    let header = Row::new(vec![
        all_marker.to_string(),
        format!("Page title{}", sort_marker(app, SortColumn::PageTitle)),
        format!("URL{}", sort_marker(app, SortColumn::Url)),
        format!("Status{}", sort_marker(app, SortColumn::Error)),
        format!("Date{}", sort_marker(app, SortColumn::CreatedAt)),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(35),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(17),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .block(block)
    .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

/// Column after `text`, kept inside `inner`.
fn cursor_x(inner: Rect, text: &str) -> u16 {
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let last = inner.x.saturating_add(inner.width.saturating_sub(1));
    inner.x.saturating_add(len).min(last)
}

fn render_pagination<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let pagination = app.store.pagination();
    if pagination.total_pages == 0 {
        return;
    }

    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        " ← Prev ",
        if pagination.can_prev() { enabled } else { disabled },
    )];
    for page in pagination.page_numbers() {
        let style = if page == pagination.current_page {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", page), style));
    }
    spans.push(Span::styled(
        " Next → ",
        if pagination.can_next() { enabled } else { disabled },
    ));
    if let Some((first, last)) = pagination.showing() {
        spans.push(Span::styled(
            format!("  Showing {} to {} of {} Entries", first, last, pagination.total_count),
            Style::default().fg(Color::Gray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_analytics<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let form = app.store.form();
    let editing = app.input_mode == InputMode::Url;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(2), // Validation / status
            Constraint::Min(0),
        ])
        .split(area);

    let block = Block::default()
        .title(" URL to analyze ")
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    let inner = block.inner(chunks[0]);
    f.render_widget(Paragraph::new(form.input().to_string()).block(block), chunks[0]);
    if editing {
        f.set_cursor_position((cursor_x(inner, form.input()), inner.y));
    }

    let status = if let Some(busy) = app.busy {
        Line::from(Span::styled(format!("⠋ {}", busy), Style::default().fg(Color::Yellow)))
    } else if let Some(message) = form.validation_message() {
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red)))
    } else {
        match form.is_success() {
            Some(true) => Line::from(Span::styled(
                "✓ Submitted",
                Style::default().fg(Color::Green),
            )),
            Some(false) => Line::from(Span::styled(
                "✗ Submission failed",
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                "Enter an http:// or https:// URL and press Enter",
                Style::default().fg(Color::DarkGray),
            )),
        }
    };
    f.render_widget(Paragraph::new(status), chunks[1]);
}

fn detail_lines(item: &CrawlItem) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if !item.error.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Error: ", label),
            Span::styled(item.error.clone(), Style::default().fg(Color::Red)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("URL: ", label),
        Span::raw(item.url().unwrap_or("").to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("HTML version: ", label),
        Span::raw(item.html_version.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Login form: ", label),
        Span::raw(if item.has_login_form { "YES" } else { "NO" }),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Date: ", label),
        Span::raw(format_date(item.created_at.as_ref())),
    ]));
    lines
}

fn render_detail<A: CrawlApi>(f: &mut Frame, app: &App<A>) {
    let detail = app.store.detail();
    let Some(item) = detail.current_item() else {
        return;
    };

    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let title = if item.is_success() {
        format!(" {} ", truncate(&item.page_title, 60))
    } else {
        format!(" {} ", FAILED_TITLE)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(detail_lines(item)).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let heading_block = Block::default().title(" Headings ").borders(Borders::ALL);
    let headings = detail.heading_chart();
    if headings.iter().all(|bar| bar.count == 0) {
        f.render_widget(
            Paragraph::new("No heading data available.")
                .style(Style::default().fg(Color::DarkGray))
                .block(heading_block),
            charts[0],
        );
    } else {
        let bars: Vec<Bar> = headings
            .iter()
            .map(|bar| {
                Bar::default()
                    .value(bar.count as u64)
                    .label(Line::from(bar.name.clone()))
            })
            .collect();
        let chart = BarChart::default()
            .block(heading_block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(4)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        f.render_widget(chart, charts[0]);
    }

    let link_block = Block::default().title(" Links ").borders(Borders::ALL);
    let links = detail.link_chart();
    if links.is_empty() {
        f.render_widget(
            Paragraph::new("No link data available.")
                .style(Style::default().fg(Color::DarkGray))
                .block(link_block),
            charts[1],
        );
    } else {
        let bars: Vec<Bar> = links
            .iter()
            .map(|slice| {
                let color = match slice.name {
                    "Internal Links" => Color::Green,
                    "External Links" => Color::Blue,
                    _ => Color::Red,
                };
                Bar::default()
                    .value(slice.value as u64)
                    .label(Line::from(slice.name))
                    .style(Style::default().fg(color))
            })
            .collect();
        let chart = BarChart::default()
            .block(link_block)
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(1);
        f.render_widget(chart, charts[1]);
    }

    let close = Paragraph::new(Line::from(vec![
        Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Close"),
    ]));
    f.render_widget(close, chunks[2]);
}

fn toast_style(notification: &Notification) -> Style {
    let color = match notification.level {
        Level::Info => Color::Blue,
        Level::Success => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    };
    Style::default().fg(color)
}

fn render_toasts<A: CrawlApi>(f: &mut Frame, app: &App<A>) {
    let notifications = app.store.notifications();
    if notifications.is_empty() {
        return;
    }

    let area = f.area();
    let width = (area.width / 3).max(30).min(area.width);
    let mut y = area.y + 3;

    let newest: Vec<&Notification> = notifications.iter().rev().take(MAX_TOASTS).collect();
    for notification in newest {
        let mut text = notification.message.clone();
        if let Some(id) = notification.item_id {
            text = format!("{} (id {})", text, id);
        }
        let height = 3;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height,
        };
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(text)
                .style(toast_style(notification))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", notification.level.as_str()))
                        .border_style(toast_style(notification)),
                ),
            rect,
        );
        y += height;
    }
}

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ),
        Span::raw(format!(" {}  ", label)),
    ]
}

fn render_hints<A: CrawlApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let hints: Vec<[Span<'static>; 2]> = match (app.screen, app.input_mode) {
        (_, InputMode::Search) => vec![key_hint("Enter", "Search"), key_hint("Esc", "Done")],
        (_, InputMode::Url) => vec![
            key_hint("Enter", "Submit"),
            key_hint("Esc", "Leave input"),
            key_hint("Tab", "Home"),
        ],
        (Screen::Analytics, InputMode::Normal) => vec![
            key_hint("Enter", "Edit URL"),
            key_hint("Tab", "Home"),
            key_hint("q", "Quit"),
        ],
        (Screen::Home, InputMode::Normal) => vec![
            key_hint("q", "Quit"),
            key_hint("Tab", "Analytics"),
            key_hint("/", "Search"),
            key_hint("c", "Clear"),
            key_hint("↑/↓", "Select"),
            key_hint("←/→", "Page"),
            key_hint("Enter", "Details"),
            key_hint("Space", "Check"),
            key_hint("a", "All"),
            key_hint("s/t/u/e", "Sort"),
        ],
    };

    let line = Line::from(hints.into_iter().flatten().collect::<Vec<_>>());
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
