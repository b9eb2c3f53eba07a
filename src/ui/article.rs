use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use super::Theme;
use crate::app::{App, ArticleView, ComposeField, Composer, DetailFocus};
use crate::content::LineKind;
use crate::models::{CommentThread, PollState};

const SIDE_PANEL_WIDTH: u16 = 32;
const SIDE_PANEL_MIN_WIDTH: u16 = 90;
const BAR_WIDTH: usize = 12;

pub fn draw(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let [progress_area, rest] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let (left, right) = if rest.width >= SIDE_PANEL_MIN_WIDTH {
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(SIDE_PANEL_WIDTH)]).areas(rest);
        (left, Some(right))
    } else {
        (rest, None)
    };

    let header_width = usize::from(left.width.saturating_sub(2));
    let (header_height, comments_open) = match app.article.as_ref() {
        Some(view) => (
            saturating_u16(header_lines(view, header_width, theme).len()).saturating_add(1),
            view.focus == DetailFocus::Comments || app.composer.is_some(),
        ),
        None => return,
    };
    let bottom_height = if comments_open { left.height / 2 } else { left.height / 3 };

    let [header_area, doc_area, bottom_area] = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(3),
        Constraint::Length(bottom_height),
    ])
    .areas(left);

    let doc_inner = doc_area.inner(ratatui::layout::Margin::new(1, 0));
    if let Some(view) = app.article.as_mut() {
        view.ensure_layout(usize::from(doc_inner.width), usize::from(doc_inner.height));
    }

    let related: Vec<String> = app.related_articles().iter().map(|a| a.title.clone()).collect();
    let Some(view) = app.article.as_ref() else {
        return;
    };

    draw_progress(frame, progress_area, view, theme);
    frame.render_widget(
        Paragraph::new(header_lines(view, header_width, theme))
            .block(Block::default().borders(Borders::BOTTOM).border_style(theme.border())),
        header_area,
    );
    draw_body(frame, doc_inner, view, theme);

    let [extras_area, comments_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(bottom_area);
    draw_extras(frame, extras_area, view.poll.as_ref(), &related, theme);
    draw_comments(frame, comments_area, view, app.composer.as_ref(), theme);

    if let Some(right) = right {
        draw_side_panel(frame, right, view, theme);
    }
}

/// Terminal coordinates are `u16`; larger counts pin to the edge.
fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_progress(frame: &mut Frame, area: Rect, view: &ArticleView, theme: &Theme) {
    let progress = view.progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.selection))
        .percent(progress)
        .label(format!("{}% read", progress));
    frame.render_widget(gauge, area);
}

fn header_lines<'a>(view: &'a ArticleView, width: usize, theme: &Theme) -> Vec<Line<'a>> {
    let article = &view.article;
    let mut lines: Vec<Line> = textwrap::wrap(&article.title, width.max(10))
        .into_iter()
        .map(|part| Line::from(Span::styled(part.into_owned(), theme.bold().fg(theme.accent))))
        .collect();

    lines.push(Line::from(vec![
        Span::styled(article.category.label(), theme.accent()),
        Span::styled(
            format!(
                " · By {} · {} · {} min read",
                article.author, article.date, article.reading_time
            ),
            theme.muted(),
        ),
    ]));

    if !article.fact_checks.is_empty() {
        let mut badges = vec![];
        for check in &article.fact_checks {
            badges.push(Span::styled(
                format!(" ✓ {} ", check.verdict.label()),
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.verdict(check.verdict))
                    .add_modifier(Modifier::BOLD),
            ));
            badges.push(Span::raw(" "));
        }
        lines.push(Line::from(badges));
    }

    if !article.tags.is_empty() {
        let mut tags = vec![];
        for (i, tag) in article.tags.iter().enumerate() {
            let style = if view.tag_cursor == Some(i) {
                theme.selected().fg(theme.accent)
            } else {
                theme.muted()
            };
            tags.push(Span::styled(tag.as_str(), style));
            tags.push(Span::raw(" "));
        }
        lines.push(Line::from(tags));
    }

    lines
}

fn draw_body(frame: &mut Frame, area: Rect, view: &ArticleView, theme: &Theme) {
    let lines: Vec<Line> = view
        .layout()
        .lines
        .iter()
        .skip(view.scroll)
        .take(usize::from(area.height))
        .map(|line| {
            let style = match line.kind {
                LineKind::Title => theme.bold(),
                LineKind::Heading(2) => theme.accent().add_modifier(Modifier::BOLD),
                LineKind::Heading(_) => theme.accent(),
                LineKind::Body | LineKind::Bullet | LineKind::Blank => Style::default().fg(theme.fg),
            };
            Line::from(Span::styled(line.text.as_str(), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Rows for a poll: numbered options before voting, bars and shares after.
pub(super) fn poll_lines<'a>(state: &PollState, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        state.poll().question.clone(),
        theme.bold(),
    ))];

    for (i, result) in state.results().into_iter().enumerate() {
        if state.has_voted() {
            let filled = (result.percentage as usize * BAR_WIDTH).div_ceil(100).min(BAR_WIDTH);
            let marker = if result.chosen { "● " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, theme.accent()),
                Span::styled(result.text, Style::default().fg(theme.fg)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  ", theme.muted()),
                Span::styled("█".repeat(filled), theme.accent()),
                Span::styled("░".repeat(BAR_WIDTH - filled), theme.muted()),
                Span::styled(format!(" {}% ({})", result.percentage, result.votes), theme.muted()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), theme.accent()),
                Span::styled(result.text, Style::default().fg(theme.fg)),
            ]));
        }
    }

    let footer = if state.has_voted() {
        format!("{} votes · thanks for voting", state.poll().total_votes())
    } else {
        format!("{} votes · press a number to vote", state.poll().total_votes())
    };
    lines.push(Line::from(Span::styled(footer, theme.muted())));
    lines
}

fn draw_extras(frame: &mut Frame, area: Rect, poll: Option<&PollState>, related: &[String], theme: &Theme) {
    let mut lines = match poll {
        Some(state) => poll_lines(state, theme),
        None => Vec::new(),
    };

    if !related.is_empty() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled("Related Articles (o opens first)", theme.bold())));
        for title in related {
            lines.push(Line::from(Span::styled(format!("› {}", title), theme.accent())));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP | Borders::RIGHT)
                    .border_style(theme.border()),
            ),
        area,
    );
}

fn comment_lines<'a>(thread: &'a CommentThread, view: &ArticleView, theme: &Theme) -> Vec<Line<'a>> {
    let focused = view.focus == DetailFocus::Comments;
    let mut lines = Vec::new();

    for (i, (depth, comment)) in thread.flatten().into_iter().enumerate() {
        let indent = "  ".repeat(depth);
        let selected = focused && i == view.comment_cursor;
        let replying = thread.active_reply() == Some(comment.id);
        let name_style = if selected {
            theme.selected().fg(theme.accent)
        } else {
            theme.bold()
        };

        let mut head = vec![
            Span::raw(indent.clone()),
            Span::styled(comment.author.as_str(), name_style),
            Span::styled(format!(" · {}", comment.date), theme.muted()),
        ];
        if replying {
            head.push(Span::styled(" (replying)", theme.accent()));
        }
        lines.push(Line::from(head));
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled(comment.text.as_str(), Style::default().fg(theme.fg)),
        ]));
    }
    lines
}

fn composer_lines<'a>(composer: &Composer, thread: &CommentThread, theme: &Theme) -> Vec<Line<'a>> {
    let title = match composer.reply_to.and_then(|id| thread.find(id)) {
        Some(parent) => format!("Reply to {}", parent.author),
        None => "Add a comment".to_string(),
    };
    let field = |label: &str, value: &str, active: bool| {
        let cursor = if active { "▏" } else { "" };
        let style = if active { theme.accent() } else { theme.muted() };
        Line::from(vec![
            Span::styled(format!("{}: ", label), style),
            Span::styled(format!("{}{}", value, cursor), Style::default().fg(theme.fg)),
        ])
    };
    vec![
        Line::from(Span::styled(title, theme.bold())),
        field("Name", &composer.author, composer.field == ComposeField::Author),
        field("Comment", &composer.text, composer.field == ComposeField::Text),
    ]
}

fn draw_comments(
    frame: &mut Frame,
    area: Rect,
    view: &ArticleView,
    composer: Option<&Composer>,
    theme: &Theme,
) {
    let border = if view.focus == DetailFocus::Comments {
        theme.accent()
    } else {
        theme.border()
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(border)
        .title(Span::styled(
            format!(" Comments ({}) ", view.comments.count_all()),
            theme.bold(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (list_area, composer_area) = match composer {
        Some(_) => {
            let [list, form] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(inner);
            (list, Some(form))
        }
        None => (inner, None),
    };

    let lines = comment_lines(&view.comments, view, theme);
    // Keep the highlighted comment on screen
    let cursor_line = view.comment_cursor * 2;
    let scroll = cursor_line.saturating_sub(usize::from(list_area.height).saturating_sub(2));
    frame.render_widget(
        Paragraph::new(lines).scroll((saturating_u16(scroll), 0)),
        list_area.inner(ratatui::layout::Margin::new(1, 0)),
    );

    if let (Some(composer), Some(form)) = (composer, composer_area) {
        frame.render_widget(
            Paragraph::new(composer_lines(composer, &view.comments, theme))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::TOP).border_style(theme.accent())),
            form,
        );
    }
}

fn draw_side_panel(frame: &mut Frame, area: Rect, view: &ArticleView, theme: &Theme) {
    let has_checks = !view.article.fact_checks.is_empty();
    let [toc_area, checks_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Percentage(if has_checks { 55 } else { 0 }),
    ])
    .areas(area);

    let active = view.active_heading();
    let mut toc = Vec::new();
    for (i, heading) in view.layout().headings.iter().enumerate() {
        let indent = if heading.level == 3 { "   " } else { " " };
        let marker = if active == Some(i) { "›" } else { " " };
        let style = if view.toc_cursor == Some(i) {
            theme.selected().fg(theme.accent)
        } else if active == Some(i) {
            theme.accent().add_modifier(Modifier::BOLD)
        } else {
            theme.muted()
        };
        toc.push(Line::from(Span::styled(
            format!("{}{}{}", marker, indent, heading.text),
            style,
        )));
    }
    if toc.is_empty() {
        toc.push(Line::from(Span::styled(" No sections", theme.muted())));
    }

    frame.render_widget(
        Paragraph::new(toc).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(theme.border())
                .title(Span::styled(" Table of Contents (t) ", theme.bold())),
        ),
        toc_area,
    );

    if has_checks {
        let mut lines = Vec::new();
        for check in &view.article.fact_checks {
            lines.push(Line::from(Span::styled(
                check.verdict.label(),
                Style::default()
                    .fg(theme.verdict(check.verdict))
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("“{}”", check.claim),
                Style::default().fg(theme.fg),
            )));
            lines.push(Line::from(Span::styled(check.explanation.as_str(), theme.muted())));
            lines.push(Line::default());
        }
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::LEFT | Borders::TOP)
                    .border_style(theme.border())
                    .title(Span::styled(" Fact Checks ", theme.bold())),
            ),
            checks_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_u16() {
        assert_eq!(saturating_u16(12), 12);
        assert_eq!(saturating_u16(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(saturating_u16(70_000), u16::MAX);
    }
}
