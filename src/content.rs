//! Derived article content: reading time, heading slugs, and the wrapped
//! document layout the detail view scrolls through.

use std::sync::LazyLock;

use regex::Regex;

/// Average reading speed in words per minute
pub const WORDS_PER_MINUTE: usize = 200;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").unwrap());
static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Estimated reading time in whole minutes, rounded up.
pub fn calculate_reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// Anchor-friendly form of a heading: lowercase, whitespace runs become a
/// hyphen, anything but ASCII word characters and hyphens is dropped, and
/// hyphen runs are collapsed and trimmed.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(&lower, "-");
    let stripped = NON_WORD_RE.replace_all(&hyphenated, "");
    let collapsed = HYPHENS_RE.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub slug: String,
}

fn heading_of(line: &str) -> Option<Heading> {
    let level = if line.starts_with("## ") {
        2
    } else if line.starts_with("### ") {
        3
    } else {
        return None;
    };
    let text = line[usize::from(level) + 1..].trim();
    if text.is_empty() {
        return None;
    }
    Some(Heading {
        level,
        text: text.to_string(),
        slug: slugify(text),
    })
}

/// Second and third level headings, in document order.
pub fn parse_headings(markdown: &str) -> Vec<Heading> {
    markdown.lines().map(str::trim_end).filter_map(heading_of).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Heading(u8),
    Body,
    Bullet,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    pub kind: LineKind,
    pub text: String,
}

/// Markdown flattened into display lines for a given width.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub lines: Vec<DocLine>,
    pub headings: Vec<Heading>,
    /// Line index of each entry in `headings`.
    pub anchors: Vec<usize>,
}

impl Layout {
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// First line carrying `slug`. Duplicate slugs resolve to the earliest heading.
    pub fn anchor(&self, slug: &str) -> Option<usize> {
        self.headings
            .iter()
            .position(|h| h.slug == slug)
            .and_then(|i| self.anchors.get(i).copied())
    }

    /// Index into `headings` of the section being read: the last heading at
    /// or above the top fifth of the viewport.
    pub fn active_heading(&self, scroll: usize, viewport_height: usize) -> Option<usize> {
        let threshold = scroll + viewport_height / 5;
        self.anchors.iter().rposition(|&line| line <= threshold)
    }
}

fn strip_inline(text: &str) -> String {
    text.replace("**", "").replace('`', "")
}

fn push_wrapped(lines: &mut Vec<DocLine>, kind: LineKind, text: &str, width: usize, indent: &str) {
    let options = textwrap::Options::new(width.max(1))
        .initial_indent(indent)
        .subsequent_indent(if indent.is_empty() { "" } else { "  " });
    for part in textwrap::wrap(text, options) {
        lines.push(DocLine {
            kind,
            text: part.into_owned(),
        });
    }
}

pub fn layout(markdown: &str, width: usize) -> Layout {
    let mut out = Layout {
        headings: parse_headings(markdown),
        ..Layout::default()
    };

    for raw in markdown.lines() {
        let line = raw.trim_end();

        if line.trim().is_empty() {
            if out.lines.last().is_some_and(|l| l.kind != LineKind::Blank) {
                out.lines.push(DocLine {
                    kind: LineKind::Blank,
                    text: String::new(),
                });
            }
            continue;
        }

        if let Some(heading) = heading_of(line) {
            out.anchors.push(out.lines.len());
            push_wrapped(
                &mut out.lines,
                LineKind::Heading(heading.level),
                &heading.text,
                width,
                "",
            );
        } else if let Some(title) = line.strip_prefix("# ") {
            push_wrapped(&mut out.lines, LineKind::Title, title.trim(), width, "");
        } else if let Some(item) = line
            .trim_start()
            .strip_prefix("- ")
            .or_else(|| line.trim_start().strip_prefix("* "))
        {
            push_wrapped(&mut out.lines, LineKind::Bullet, &strip_inline(item), width, "• ");
        } else {
            push_wrapped(&mut out.lines, LineKind::Body, &strip_inline(line), width, "");
        }
    }

    while out.lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
        out.lines.pop();
    }

    out
}

/// How far through the document the reader is, as a percentage.
///
/// A document that fits in the viewport reads as complete once scrolled at all.
pub fn reading_progress(scroll: usize, content_height: usize, viewport_height: usize) -> u16 {
    if content_height <= viewport_height {
        return if scroll > 0 { 100 } else { 0 };
    }
    let scrollable = (content_height - viewport_height) as f64;
    let progress = scroll as f64 / scrollable * 100.0;
    progress.clamp(0.0, 100.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Reading time ====================

    #[test]
    fn test_reading_time_empty() {
        assert_eq!(calculate_reading_time(""), 0);
        assert_eq!(calculate_reading_time("   \n\t "), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(calculate_reading_time("one"), 1);
        assert_eq!(calculate_reading_time(&vec!["word"; 200].join(" ")), 1);
        assert_eq!(calculate_reading_time(&vec!["word"; 201].join(" ")), 2);
    }

    #[test]
    fn test_reading_time_400_words() {
        let text = vec!["word"; 400].join(" ");
        assert_eq!(calculate_reading_time(&text), 2);
    }

    #[test]
    fn test_reading_time_mixed_whitespace() {
        let text = "a\n\nb\tc   d";
        assert_eq!(calculate_reading_time(text), 1);
    }

    // ==================== Slugify ====================

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("What Makes It Special"), "what-makes-it-special");
        assert_eq!(slugify("Real-World Applications"), "real-world-applications");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("C++ & Rust -- a tale"), "c-rust-a-tale");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        let inputs = [
            "Mixed CASE Heading",
            "Punctuation: does it; survive?",
            "repeated     whitespace\t\there",
            "--leading and trailing--",
            "Ünïcödé Wörds",
            "already-a-slug",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
        }
    }

    // ==================== Headings ====================

    #[test]
    fn test_parse_headings_levels_and_slugs() {
        let headings = parse_headings("## A\n\nbody\n\n### B");

        assert_eq!(headings.len(), 2);
        assert_eq!(
            headings.iter().map(|h| h.level).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(
            headings.iter().map(|h| h.slug.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_parse_headings_ignores_other_lines() {
        let md = "# Title\n#### Too deep\n##NoSpace\n  ## indented\n## \ntext ## inline\n## Kept";
        let headings = parse_headings(md);

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Kept");
    }

    #[test]
    fn test_parse_headings_keeps_duplicates() {
        let headings = parse_headings("## Intro\n## Intro");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].slug, headings[1].slug);
    }

    // ==================== Layout ====================

    #[test]
    fn test_layout_records_anchors() {
        let md = "# Title\n\nIntro paragraph.\n\n## First\n\nBody.\n\n### Second\n\n- item";
        let layout = layout(md, 80);

        assert_eq!(layout.lines[0].kind, LineKind::Title);
        assert_eq!(layout.headings.len(), 2);

        let first = layout.anchor("first").unwrap();
        assert_eq!(layout.lines[first].kind, LineKind::Heading(2));
        assert_eq!(layout.lines[first].text, "First");

        let second = layout.anchor("second").unwrap();
        assert_eq!(layout.lines[second].kind, LineKind::Heading(3));
        assert!(second > first);

        let last = layout.lines.last().unwrap();
        assert_eq!(last.kind, LineKind::Bullet);
        assert_eq!(last.text, "• item");
    }

    #[test]
    fn test_layout_headings_match_parsed_headings() {
        let md = "## Intro  \n\ntext\n\n## Intro\n\n### Deep Dive\n\n##\n";
        let layout = layout(md, 40);

        assert_eq!(layout.headings, parse_headings(md));
        assert_eq!(layout.anchors.len(), layout.headings.len());
        // Duplicate slugs resolve to the first heading
        assert_eq!(layout.anchor("intro"), Some(layout.anchors[0]));
        assert_eq!(layout.anchor("missing"), None);
    }

    #[test]
    fn test_layout_wraps_and_collapses_blanks() {
        let md = "one two three four five six\n\n\n\nseven";
        let layout = layout(md, 10);

        let blanks = layout
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Blank)
            .count();
        assert_eq!(blanks, 1);
        assert!(layout.lines.iter().all(|l| l.text.chars().count() <= 10));
        assert_eq!(layout.lines.last().unwrap().text, "seven");
    }

    #[test]
    fn test_layout_strips_bold_markers() {
        let layout = layout("This is **bold** text", 80);
        assert_eq!(layout.lines[0].text, "This is bold text");
    }

    #[test]
    fn test_active_heading() {
        let md = "## A\n\n1\n2\n3\n4\n5\n6\n\n## B\n\n7";
        let layout = layout(md, 80);
        let b = layout.anchor("b").unwrap();

        assert_eq!(layout.active_heading(0, 5), Some(0));
        assert_eq!(layout.active_heading(b, 5), Some(1));
        assert_eq!(Layout::default().active_heading(3, 10), None);
    }

    // ==================== Progress ====================

    #[test]
    fn test_reading_progress() {
        assert_eq!(reading_progress(0, 100, 20), 0);
        assert_eq!(reading_progress(40, 100, 20), 50);
        assert_eq!(reading_progress(80, 100, 20), 100);
        assert_eq!(reading_progress(500, 100, 20), 100);
    }

    #[test]
    fn test_reading_progress_short_document() {
        assert_eq!(reading_progress(0, 10, 20), 0);
        assert_eq!(reading_progress(1, 10, 20), 100);
    }
}
