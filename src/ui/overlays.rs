use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{centered_rect, Theme};
use crate::app::{App, LiveUpdate, Toast};

const SKELETON_CARDS: usize = 4;

pub fn draw_live_banner(frame: &mut Frame, area: Rect, update: &LiveUpdate, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(format!(" {} ", update.message), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  (x to dismiss)"),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(theme.bg).bg(theme.live_update(update.kind))),
        area,
    );
}

pub fn draw_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let rect = centered_rect(area.width.saturating_sub(8).min(70), 7, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error))
        .title(Span::styled(" Something went wrong ", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)));

    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(theme.fg))),
        Line::default(),
        Line::from(Span::styled("Press r to try again", theme.muted())),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        rect,
    );
}

/// Placeholder cards shown while articles load.
pub fn draw_skeleton(frame: &mut Frame, area: Rect, theme: &Theme) {
    let bar = Style::default().fg(theme.skeleton);
    let width = usize::from(area.width.saturating_sub(4));
    let mut lines = vec![Line::from(Span::styled(" Loading articles…", theme.muted())), Line::default()];

    for i in 0..SKELETON_CARDS {
        let title = width * (6 + i % 3) / 10;
        lines.push(Line::from(Span::styled(format!("  {}", "▆".repeat(title)), bar)));
        lines.push(Line::from(Span::styled(format!("  {}", "▂".repeat(width / 3)), bar)));
        lines.push(Line::from(Span::styled(format!("  {}", "▂".repeat(width * 9 / 10)), bar)));
        lines.push(Line::from(Span::styled(format!("  {}", "▂".repeat(width * 7 / 10)), bar)));
        lines.push(Line::default());
    }
    frame.render_widget(Paragraph::new(lines), area);
}

pub fn draw_empty(frame: &mut Frame, area: Rect, title: &str, hint: &str, theme: &Theme) {
    let rect = centered_rect(area.width, 4, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(title, theme.bold())),
            Line::default(),
            Line::from(Span::styled(hint, theme.muted())),
        ])
        .alignment(Alignment::Center),
        rect,
    );
}

pub fn draw_search(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(search) = &app.search else {
        return;
    };
    let rect = centered_rect(area.width.saturating_sub(4).min(72), 14, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.accent())
        .title(Span::styled(" Search ", theme.bold()))
        .style(theme.base());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let [input_area, results_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ⌕ ", theme.accent()),
            Span::styled(search.input.as_str(), theme.bold()),
            Span::styled("▏", theme.accent()),
        ]))
        .block(Block::default().borders(Borders::BOTTOM).border_style(theme.border())),
        input_area,
    );

    let row_style = |i: usize| {
        if search.cursor == Some(i) {
            theme.selected().fg(theme.accent)
        } else {
            Style::default().fg(theme.fg)
        }
    };

    let mut lines = Vec::new();
    if search.input.is_empty() {
        if app.recent_searches.is_empty() {
            lines.push(Line::from(Span::styled(" Search titles and excerpts", theme.muted())));
        } else {
            lines.push(Line::from(Span::styled(" Recent searches", theme.muted())));
            for (i, term) in app.recent_searches.iter().enumerate() {
                lines.push(Line::from(Span::styled(format!(" ↺ {}", term), row_style(i))));
            }
        }
    } else {
        let suggestions = app.search_suggestions();
        if suggestions.is_empty() {
            lines.push(Line::from(Span::styled(
                " No title matches. Press Enter to search everything.",
                theme.muted(),
            )));
        }
        for (i, article) in suggestions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!(" {}", article.title), row_style(i)),
                Span::styled(format!("  {}", article.category.label()), theme.muted()),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines), results_area);
}

pub fn draw_toast(frame: &mut Frame, area: Rect, toast: &Toast, theme: &Theme) {
    let width = u16::try_from(toast.message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let height = 3.min(area.height);
    let rect = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.bottom().saturating_sub(height + 1),
        width,
        height,
    };
    let color = theme.toast(toast.kind);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Span::styled(toast.message.as_str(), Style::default().fg(color)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .style(theme.base()),
            ),
        rect,
    );
}
