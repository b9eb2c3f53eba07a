use ratatui::style::{Color, Modifier, Style};

use crate::app::{LiveUpdateKind, ToastKind};
use crate::models::Verdict;

/// Colors for one display mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub breaking: Color,
    pub update: Color,
    pub success: Color,
    pub error: Color,
    pub skeleton: Color,
}

impl Theme {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    fn dark() -> Self {
        Self {
            bg: Color::Rgb(17, 24, 39),
            fg: Color::Rgb(229, 231, 235),
            muted: Color::Rgb(156, 163, 175),
            accent: Color::Rgb(96, 165, 250),
            border: Color::Rgb(55, 65, 81),
            selection: Color::Rgb(31, 41, 55),
            breaking: Color::Rgb(239, 68, 68),
            update: Color::Rgb(59, 130, 246),
            success: Color::Rgb(34, 197, 94),
            error: Color::Rgb(248, 113, 113),
            skeleton: Color::Rgb(55, 65, 81),
        }
    }

    fn light() -> Self {
        Self {
            bg: Color::Rgb(249, 250, 251),
            fg: Color::Rgb(17, 24, 39),
            muted: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(37, 99, 235),
            border: Color::Rgb(209, 213, 219),
            selection: Color::Rgb(229, 231, 235),
            breaking: Color::Rgb(220, 38, 38),
            update: Color::Rgb(37, 99, 235),
            success: Color::Rgb(22, 163, 74),
            error: Color::Rgb(220, 38, 38),
            skeleton: Color::Rgb(209, 213, 219),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.selection).add_modifier(Modifier::BOLD)
    }

    pub fn verdict(&self, verdict: Verdict) -> Color {
        match verdict {
            Verdict::Verified => self.success,
            Verdict::LikelyTrue => Color::Rgb(132, 204, 22),
            Verdict::NeedsContext => Color::Rgb(234, 179, 8),
            Verdict::Misleading => self.error,
            Verdict::Unrated => self.muted,
        }
    }

    pub fn live_update(&self, kind: LiveUpdateKind) -> Color {
        match kind {
            LiveUpdateKind::Breaking => self.breaking,
            LiveUpdateKind::Update => self.update,
        }
    }

    pub fn toast(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success,
            ToastKind::Error => self.error,
        }
    }
}
