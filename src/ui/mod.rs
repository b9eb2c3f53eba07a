mod article;
mod feed;
mod overlays;
mod sidebar;
mod theme;

use chrono::Local;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::models::{AppView, Category};

pub use theme::Theme;

/// Below this width the sidebar is hidden.
const SIDEBAR_MIN_WIDTH: u16 = 100;
const SIDEBAR_WIDTH: u16 = 34;
const TICKER_SEPARATOR: &str = "   •   ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = Theme::for_mode(app.dark_mode);
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.base()), area);

    let banner_height = u16::from(app.live_update.is_some());
    let [header, ticker, banner, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(banner_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, app, &theme);
    draw_ticker(frame, ticker, app, &theme);
    if let Some(update) = &app.live_update {
        overlays::draw_live_banner(frame, banner, update, &theme);
    }

    let (main, side) = if body.width >= SIDEBAR_MIN_WIDTH && app.article.is_none() {
        let [main, side] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)]).areas(body);
        (main, Some(side))
    } else {
        (body, None)
    };

    if let Some(message) = &app.error {
        overlays::draw_error(frame, main, message, &theme);
    } else if app.is_loading {
        overlays::draw_skeleton(frame, main, &theme);
    } else if app.article.is_some() {
        article::draw(frame, main, app, &theme);
    } else {
        feed::draw(frame, main, app, &theme);
    }

    if let Some(side) = side {
        sidebar::draw(frame, side, app, &theme);
    }

    draw_footer(frame, footer, app, &theme);

    if app.search.is_some() {
        overlays::draw_search(frame, area, app, &theme);
    }
    if let Some(toast) = &app.toast {
        overlays::draw_toast(frame, area, toast, &theme);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let [top, tabs] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let now = Local::now();
    let title = Line::from(vec![
        Span::styled(" NEWSDESK ", theme.accent().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {} ", now.format("%A, %B %-d, %Y  %H:%M")), theme.muted()),
    ]);
    let status = Line::from(vec![
        Span::styled(format!("view: {} ", app.view.label()), theme.muted()),
        Span::styled(format!(" sort: {} ", app.sort.label()), theme.muted()),
        Span::styled(if app.dark_mode { " ☾ " } else { " ☀ " }, theme.muted()),
    ])
    .right_aligned();
    frame.render_widget(Paragraph::new(title), top);
    frame.render_widget(Paragraph::new(status), top);

    let mut spans = vec![Span::raw(" ")];
    for category in Category::ALL {
        let active = app.view == AppView::Home && category == app.category;
        let style = if active {
            theme.accent().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            theme.muted()
        };
        spans.push(Span::styled(category.label(), style));
        spans.push(Span::styled("  │  ", theme.border()));
    }
    let saved_style = if app.view == AppView::Saved {
        theme.accent().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        theme.muted()
    };
    spans.push(Span::styled(format!("★ Saved ({})", app.saved_ids.len()), saved_style));
    frame.render_widget(Paragraph::new(Line::from(spans)), tabs);
}

fn draw_ticker(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let label = " BREAKING ";
    let [label_area, text_area] =
        Layout::horizontal([Constraint::Length(label.len() as u16), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(label).style(
            Style::default()
                .fg(theme.bg)
                .bg(theme.breaking)
                .add_modifier(Modifier::BOLD),
        ),
        label_area,
    );

    let text = app.ticker_headlines().join(TICKER_SEPARATOR);
    let window = ticker_window(&text, app.ticker_offset, usize::from(text_area.width));
    frame.render_widget(
        Paragraph::new(format!(" {}", window)).style(Style::default().fg(theme.fg).bg(theme.selection)),
        text_area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hints = if app.composer.is_some() {
        "Tab switch field · Enter next/post · Esc cancel"
    } else if app.search.is_some() {
        "type to search · ↑↓ choose · Enter open/search · Esc close"
    } else if app.article.is_some() {
        "Esc back · j/k scroll · n/p section · t contents · Tab comments · r reply · c comment · s save · 1-9 vote · # tag · o next"
    } else if app.error.is_some() {
        "r retry · h/l category · q quit"
    } else {
        "j/k move · Enter open · h/l category · / search · s save · o sort · v view · # tag · m compact · d theme · q quit"
    };
    frame.render_widget(Paragraph::new(format!(" {}", hints)).style(theme.muted()), area);
}

/// `width` characters of `text` looped end to end, starting `offset` characters in.
pub fn ticker_window(text: &str, offset: usize, width: usize) -> String {
    let chars: Vec<char> = text.chars().chain(TICKER_SEPARATOR.chars()).collect();
    if text.is_empty() {
        return String::new();
    }
    let start = offset % chars.len();
    chars.iter().cycle().skip(start).take(width).collect()
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
