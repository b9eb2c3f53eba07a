use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::{overlays, Theme};
use crate::app::App;
use crate::models::{AppView, Article};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let [heading, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let visible = app.visible_articles();
    draw_heading(frame, heading, app, visible.len(), theme);

    if visible.is_empty() {
        let (title, hint) = match (app.view, app.active_filter()) {
            (AppView::Saved, None) => (
                "No saved articles yet",
                "Press s on any article to keep it here.",
            ),
            (_, Some(_)) => ("No articles found", "Press c to clear the filter."),
            _ => ("No articles found", "Try another category or press r to reload."),
        };
        overlays::draw_empty(frame, list_area, title, hint, theme);
        return;
    }

    let width = usize::from(list_area.width.saturating_sub(4));
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let featured = i == 0 && !app.compact && app.view == AppView::Home;
            article_item(article, app.is_saved(&article.id), featured, app.compact, width, theme)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::TOP).border_style(theme.border()))
        .highlight_style(theme.selected())
        .highlight_symbol("▌ ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn draw_heading(frame: &mut Frame, area: Rect, app: &App, count: usize, theme: &Theme) {
    let title = match app.view {
        AppView::Home => format!(" {} ", app.category.label()),
        AppView::Saved => " Saved Articles ".to_string(),
    };
    let mut spans = vec![
        Span::styled(title, theme.bold()),
        Span::styled(format!(" {} articles ", count), theme.muted()),
    ];
    if let Some(tag) = &app.tag {
        spans.push(Span::styled(format!(" tag: {} ", tag), theme.accent()));
    }
    if !app.search_term.is_empty() {
        spans.push(Span::styled(format!(" search: \"{}\" ", app.search_term), theme.accent()));
    }
    if app.active_filter().is_some() {
        spans.push(Span::styled("(c to clear)", theme.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn article_item<'a>(
    article: &'a Article,
    saved: bool,
    featured: bool,
    compact: bool,
    width: usize,
    theme: &Theme,
) -> ListItem<'a> {
    let mut title_style = theme.bold();
    if featured {
        title_style = title_style.fg(theme.accent);
    }

    let mut title = vec![];
    if featured {
        title.push(Span::styled(
            " FEATURED ",
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        title.push(Span::raw(" "));
    }
    title.push(Span::styled(article.title.as_str(), title_style));
    if saved {
        title.push(Span::styled(" ★", theme.accent()));
    }

    let meta = Line::from(vec![
        Span::styled(article.category.label(), theme.accent()),
        Span::styled(
            format!(
                " · {} · {} · {} min read · ▲ {}",
                article.author, article.date, article.reading_time, article.popularity
            ),
            theme.muted(),
        ),
    ]);

    let mut lines = vec![Line::from(title), meta];
    if compact {
        return ListItem::new(lines);
    }

    let excerpt_lines = if featured { 4 } else { 2 };
    for part in textwrap::wrap(&article.excerpt, width.max(10)).into_iter().take(excerpt_lines) {
        lines.push(Line::from(Span::styled(part.into_owned(), Style::default().fg(theme.fg))));
    }
    if !article.tags.is_empty() {
        lines.push(Line::from(Span::styled(article.tags.join(" "), theme.muted())));
    }
    lines.push(Line::default());
    ListItem::new(lines)
}
