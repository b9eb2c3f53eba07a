use chrono::{Datelike, Local, NaiveDate};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::article::poll_lines;
use super::Theme;
use crate::app::App;
use crate::feed_query;

const WEATHER_LOCATION: &str = "Tech City";
const WEATHER_TEMPERATURE: i32 = 72;
const WEATHER_CONDITION: &str = "Sunny";
const WEATHER_ICON: &str = "☀️";

pub fn draw(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let poll_height = app.sidebar_poll.poll().options.len() as u16 * 2 + 4;
    let [weather, trending, calendar, tags, poll, ad] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(poll_height),
        Constraint::Min(0),
    ])
    .areas(area);

    draw_weather(frame, weather, theme);
    draw_trending(frame, trending, app, theme);
    draw_calendar(frame, calendar, Local::now().date_naive(), theme);
    draw_tags(frame, tags, app, theme);
    frame.render_widget(
        Paragraph::new(poll_lines(&app.sidebar_poll, theme))
            .wrap(Wrap { trim: true })
            .block(section(" Poll ", theme)),
        poll,
    );
    draw_ad(frame, ad, theme);
}

fn section<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::LEFT | Borders::TOP)
        .border_style(theme.border())
        .title(Span::styled(title, theme.bold()))
}

fn draw_weather(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", WEATHER_ICON)),
            Span::styled(format!("{}°F", WEATHER_TEMPERATURE), theme.bold()),
        ]),
        Line::from(Span::styled(
            format!("{} · {}", WEATHER_CONDITION, WEATHER_LOCATION),
            theme.muted(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(section(" Weather ", theme)), area);
}

fn draw_trending(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let width = usize::from(area.width.saturating_sub(5));
    let lines: Vec<Line> = feed_query::trending(&app.articles)
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let title = textwrap::wrap(&article.title, width.max(8))
                .into_iter()
                .next()
                .map(|s| s.into_owned())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), theme.accent().add_modifier(Modifier::BOLD)),
                Span::styled(title, Style::default().fg(theme.fg)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(section(" Trending ", theme)), area);
}

/// Weeks of `month`, Sunday first, with `None` padding outside the month.
pub fn month_grid(day: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let Some(first) = day.with_day(1) else {
        return Vec::new();
    };
    let days_in_month = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day());

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut column = first.weekday().num_days_from_sunday() as usize;
    for d in 1..=days_in_month {
        week[column] = Some(d);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}

fn draw_calendar(frame: &mut Frame, area: Rect, today: NaiveDate, theme: &Theme) {
    let mut lines = vec![
        Line::from(Span::styled(today.format("%B %Y").to_string(), theme.bold())),
        Line::from(Span::styled("Su Mo Tu We Th Fr Sa", theme.muted())),
    ];
    for week in month_grid(today) {
        let mut spans = Vec::new();
        for day in week {
            let span = match day {
                Some(d) if d == today.day() => Span::styled(
                    format!("{:>2}", d),
                    Style::default()
                        .fg(theme.bg)
                        .bg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Some(d) => Span::styled(format!("{:>2}", d), Style::default().fg(theme.fg)),
                None => Span::raw("  "),
            };
            spans.push(span);
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(section(" Calendar ", theme)),
        area,
    );
}

fn draw_tags(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = Vec::new();
    for tag in app.popular_tags() {
        let style = if app.tag.as_deref() == Some(tag.as_str()) {
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            theme.accent()
        };
        spans.push(Span::styled(tag, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(section(" Popular Tags (#) ", theme)),
        area,
    );
}

fn draw_ad(frame: &mut Frame, area: Rect, theme: &Theme) {
    if area.height < 3 {
        return;
    }
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("Advertisement", theme.muted())),
            Line::from(Span::styled("Your ad here", theme.muted().add_modifier(Modifier::ITALIC))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border()),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_grid_starts_on_weekday() {
        // October 1st, 2026 is a Thursday
        let weeks = month_grid(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());

        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], [None, None, None, None, Some(1), Some(2), Some(3)]);
        assert_eq!(weeks[4][6], Some(31));
    }

    #[test]
    fn test_month_grid_leap_february() {
        let weeks = month_grid(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        let last = weeks.iter().flatten().flatten().max().copied();
        assert_eq!(last, Some(29));
    }
}
