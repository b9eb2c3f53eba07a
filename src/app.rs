use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::content::{self, Layout};
use crate::error::{AppError, Result};
use crate::feed_query::{self, FeedQuery, POPULAR_TAG_COUNT};
use crate::models::{
    AppView, Article, Category, CommentId, CommentThread, Poll, PollState, SortOrder,
};
use crate::source;
use crate::store::{self, Store};

const TOAST_DURATION: Duration = Duration::from_secs(3);
const HEADER_ARTICLE_COUNT: usize = 5;
const SIDEBAR_POLL_ID: &str = "sidebar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveUpdateKind {
    Breaking,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveUpdate {
    pub message: String,
    pub kind: LiveUpdateKind,
}

/// A category load the event loop still has to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Body,
    Comments,
}

/// The open article and everything scoped to it.
pub struct ArticleView {
    pub article: Article,
    pub comments: CommentThread,
    pub poll: Option<PollState>,
    pub focus: DetailFocus,
    pub scroll: usize,
    pub viewport_height: usize,
    pub comment_cursor: usize,
    pub tag_cursor: Option<usize>,
    /// Highlighted table of contents entry.
    pub toc_cursor: Option<usize>,
    /// Set once the reader scrolls down, even if the body already fits on screen.
    past_top: bool,
    layout: Layout,
    layout_width: usize,
}

impl ArticleView {
    fn new(article: Article, store: &Store) -> Self {
        let poll = article.poll.clone().map(|poll| {
            let key = PollState::store_key(&article.id);
            let voted = store.poll_vote(&key);
            PollState::new(key, poll, voted)
        });
        Self {
            article,
            comments: CommentThread::seeded(),
            poll,
            focus: DetailFocus::Body,
            scroll: 0,
            viewport_height: 0,
            comment_cursor: 0,
            tag_cursor: None,
            toc_cursor: None,
            past_top: false,
            layout: Layout::default(),
            layout_width: 0,
        }
    }

    /// Re-flow the body for `width` columns if it changed since the last draw.
    pub fn ensure_layout(&mut self, width: usize, viewport_height: usize) {
        if width != self.layout_width {
            self.layout = content::layout(&self.article.content, width);
            self.layout_width = width;
        }
        self.viewport_height = viewport_height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn max_scroll(&self) -> usize {
        self.layout.height().saturating_sub(self.viewport_height)
    }

    pub fn progress(&self) -> u16 {
        let scroll = if self.past_top { self.scroll.max(1) } else { self.scroll };
        content::reading_progress(scroll, self.layout.height(), self.viewport_height)
    }

    pub fn active_heading(&self) -> Option<usize> {
        self.layout.active_heading(self.scroll, self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_to(self.scroll.saturating_add_signed(delta));
    }

    pub fn scroll_to(&mut self, line: usize) {
        self.scroll = line.min(self.max_scroll());
        self.past_top = line > 0;
    }

    /// Jump to the next (`forward`) or previous section heading.
    pub fn jump_heading(&mut self, forward: bool) {
        let anchors = &self.layout.anchors;
        let target = if forward {
            anchors.iter().copied().find(|&line| line > self.scroll)
        } else {
            anchors.iter().rev().copied().find(|&line| line < self.scroll)
        };
        match target {
            Some(line) => self.scroll_to(line),
            None if !forward => self.scroll_to(0),
            None => {}
        }
    }

    pub fn selected_comment(&self) -> Option<CommentId> {
        self.comments
            .flatten()
            .get(self.comment_cursor)
            .map(|(_, c)| c.id)
    }

    fn move_comment_cursor(&mut self, delta: isize) {
        let count = self.comments.count_all();
        if count == 0 {
            self.comment_cursor = 0;
            return;
        }
        self.comment_cursor = self
            .comment_cursor
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    fn cycle_tag(&mut self) {
        self.tag_cursor = cycle_cursor(self.tag_cursor, self.article.tags.len());
        self.toc_cursor = None;
    }

    fn cycle_toc(&mut self) {
        self.toc_cursor = cycle_cursor(self.toc_cursor, self.layout.headings.len());
        self.tag_cursor = None;
    }

    /// Scroll to the highlighted table of contents entry by its slug.
    pub fn jump_to_toc_entry(&mut self) -> bool {
        let Some(heading) = self.toc_cursor.and_then(|i| self.layout.headings.get(i)) else {
            return false;
        };
        match self.layout.anchor(&heading.slug) {
            Some(line) => {
                self.scroll_to(line);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Author,
    Text,
}

#[derive(Debug, Clone)]
pub struct Composer {
    /// `None` for a new top-level comment.
    pub reply_to: Option<CommentId>,
    pub author: String,
    pub text: String,
    pub field: ComposeField,
}

impl Composer {
    fn new(reply_to: Option<CommentId>) -> Self {
        Self {
            reply_to,
            author: String::new(),
            text: String::new(),
            field: ComposeField::Author,
        }
    }

    fn active_field(&mut self) -> &mut String {
        match self.field {
            ComposeField::Author => &mut self.author,
            ComposeField::Text => &mut self.text,
        }
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            ComposeField::Author => ComposeField::Text,
            ComposeField::Text => ComposeField::Author,
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub input: String,
    /// Highlighted suggestion, or recent search while the input is empty.
    pub cursor: Option<usize>,
}

pub struct App {
    store: Store,
    /// Articles of the current category, in provider order.
    pub articles: Vec<Article>,
    /// Every article fetched this session; the saved view reads from here.
    pub library: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub category: Category,
    pub tag: Option<String>,
    pub search_term: String,
    pub view: AppView,
    pub sort: SortOrder,
    pub compact: bool,
    pub selected: usize,
    pub saved_ids: Vec<String>,
    pub recent_searches: Vec<String>,
    pub dark_mode: bool,
    pub article: Option<ArticleView>,
    pub search: Option<SearchState>,
    pub composer: Option<Composer>,
    pub toast: Option<Toast>,
    pub live_update: Option<LiveUpdate>,
    pub sidebar_poll: PollState,
    pub ticker_offset: usize,
    pub should_quit: bool,
    generation: u64,
    pending_fetch: Option<FetchRequest>,
}

impl App {
    /// Build the initial state from the store and queue the first load.
    pub fn new(store: Store) -> Self {
        let sidebar_key = PollState::store_key(SIDEBAR_POLL_ID);
        let sidebar_vote = store.poll_vote(&sidebar_key);

        let mut app = Self {
            articles: Vec::new(),
            library: Vec::new(),
            is_loading: false,
            error: None,
            category: Category::Latest,
            tag: None,
            search_term: String::new(),
            view: AppView::Home,
            sort: SortOrder::Newest,
            compact: false,
            selected: 0,
            saved_ids: store.saved_articles(),
            recent_searches: store.recent_searches(),
            dark_mode: store.dark_mode(),
            article: None,
            search: None,
            composer: None,
            toast: None,
            live_update: None,
            sidebar_poll: PollState::new(sidebar_key, Poll::sidebar(), sidebar_vote),
            ticker_offset: 0,
            should_quit: false,
            generation: 0,
            pending_fetch: None,
            store,
        };
        app.request_articles();
        app
    }

    // ==================== Loading ====================

    fn request_articles(&mut self) {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        self.article = None;
        self.selected = 0;
        self.pending_fetch = Some(FetchRequest {
            generation: self.generation,
            category: self.category,
        });
        tracing::info!("Loading articles for category: {}", self.category.label());
    }

    pub fn take_fetch_request(&mut self) -> Option<FetchRequest> {
        self.pending_fetch.take()
    }

    /// Apply a finished fetch. Results from superseded requests are dropped.
    pub fn on_articles_loaded(&mut self, generation: u64, category: Category, result: Result<Vec<Article>>) {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale {} articles (request {} superseded by {})",
                category.label(),
                generation,
                self.generation
            );
            return;
        }

        self.is_loading = false;
        match result {
            Ok(articles) => {
                tracing::info!("Loaded {} articles for {}", articles.len(), category.label());
                self.remember_articles(&articles);
                self.articles = articles;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Error loading articles: {}", e);
                self.articles.clear();
                self.error = Some(source::user_message(&e));
            }
        }
        self.selected = 0;
    }

    fn remember_articles(&mut self, articles: &[Article]) {
        for article in articles {
            match self.library.iter_mut().find(|a| a.id == article.id) {
                Some(existing) => *existing = article.clone(),
                None => self.library.push(article.clone()),
            }
        }
    }

    pub fn retry(&mut self) {
        self.request_articles();
    }

    // ==================== Derived views ====================

    pub fn visible_articles(&self) -> Vec<&Article> {
        let pool = match self.view {
            AppView::Home => &self.articles,
            AppView::Saved => &self.library,
        };
        feed_query::visible_articles(
            pool,
            &FeedQuery {
                view: self.view,
                saved_ids: &self.saved_ids,
                search: &self.search_term,
                tag: self.tag.as_deref(),
                sort: self.sort,
            },
        )
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected).copied()
    }

    pub fn popular_tags(&self) -> Vec<String> {
        feed_query::popular_tags(&self.articles, POPULAR_TAG_COUNT)
    }

    pub fn ticker_headlines(&self) -> Vec<&str> {
        self.articles
            .iter()
            .take(HEADER_ARTICLE_COUNT)
            .map(|a| a.title.as_str())
            .collect()
    }

    pub fn related_articles(&self) -> Vec<&Article> {
        match &self.article {
            Some(view) => feed_query::related(&view.article, &self.articles),
            None => Vec::new(),
        }
    }

    pub fn search_suggestions(&self) -> Vec<&Article> {
        match &self.search {
            Some(search) => feed_query::suggestions(&search.input, &self.articles),
            None => Vec::new(),
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_ids.iter().any(|s| s == id)
    }

    /// Filter description shown above the feed, if any filter is active.
    pub fn active_filter(&self) -> Option<&str> {
        self.tag
            .as_deref()
            .or_else(|| (!self.search_term.is_empty()).then_some(self.search_term.as_str()))
    }

    // ==================== Navigation ====================

    pub fn select_category(&mut self, category: Category) {
        let changed = category != self.category || self.view != AppView::Home;
        self.view = AppView::Home;
        self.category = category;
        self.search_term.clear();
        self.tag = None;
        self.article = None;
        if changed {
            self.request_articles();
        }
    }

    /// Filter by `tag`, or clear the filter if it is already active.
    pub fn select_tag(&mut self, tag: &str) {
        if self.view != AppView::Home {
            self.view = AppView::Home;
            self.request_articles();
        }
        self.tag = if self.tag.as_deref() == Some(tag) {
            None
        } else {
            Some(tag.to_string())
        };
        self.article = None;
        self.search_term.clear();
        self.selected = 0;
    }

    pub fn set_view(&mut self, view: AppView) {
        let view_changed = view != self.view;
        self.view = view;
        self.article = None;
        self.tag = None;
        self.search_term.clear();
        self.selected = 0;

        let mut category_changed = false;
        if view == AppView::Home && self.category != Category::Latest {
            self.category = Category::Latest;
            category_changed = true;
        }
        if view == AppView::Home && (view_changed || category_changed) {
            self.request_articles();
        }
    }

    pub fn submit_search(&mut self, term: &str) {
        if term.trim().is_empty() {
            return;
        }
        self.recent_searches = store::remember_search(&self.recent_searches, term);
        let saved = self.store.set_recent_searches(&self.recent_searches);
        self.persisted(saved);

        if self.view != AppView::Home {
            self.view = AppView::Home;
            self.request_articles();
        }
        self.search_term = term.to_string();
        self.article = None;
        self.tag = None;
        self.search = None;
        self.selected = 0;
    }

    pub fn open_article(&mut self, article: Article) {
        tracing::debug!("Opening article {}", article.id);
        self.article = Some(ArticleView::new(article, &self.store));
        self.search = None;
        self.composer = None;
    }

    pub fn go_back(&mut self) {
        self.article = None;
        self.composer = None;
    }

    pub fn clear_filters(&mut self) {
        self.tag = None;
        self.search_term.clear();
        self.selected = 0;
    }

    /// Step through the sidebar's popular tags, ending with no filter.
    pub fn cycle_popular_tag(&mut self) {
        let tags = self.popular_tags();
        let next = match self.tag.as_ref().and_then(|t| tags.iter().position(|x| x == t)) {
            Some(i) => tags.get(i + 1).cloned(),
            None => tags.first().cloned(),
        };
        match next {
            Some(tag) => self.select_tag(&tag),
            None => self.clear_filters(),
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let count = self.visible_articles().len();
        if count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(count - 1);
    }

    // ==================== Preferences ====================

    fn persisted(&self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!("Failed to save preferences: {}", e);
        }
    }

    pub fn toggle_save(&mut self, article_id: &str) {
        if let Some(pos) = self.saved_ids.iter().position(|id| id == article_id) {
            self.saved_ids.remove(pos);
            self.show_toast("Article removed from saved", ToastKind::Success);
        } else {
            self.saved_ids.push(article_id.to_string());
            self.show_toast("Article saved!", ToastKind::Success);
        }
        let saved = self.store.set_saved_articles(&self.saved_ids);
        self.persisted(saved);
        self.move_selection(0);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        let saved = self.store.set_dark_mode(self.dark_mode);
        self.persisted(saved);
    }

    pub fn vote_article_poll(&mut self, index: usize) {
        let Some(state) = self.article.as_mut().and_then(|v| v.poll.as_mut()) else {
            return;
        };
        if state.vote_index(index) {
            let key = state.key().to_string();
            let choice = state.voted().unwrap_or_default().to_string();
            let saved = self.store.set_poll_vote(&key, &choice);
            self.persisted(saved);
            self.show_toast("Thanks for voting!", ToastKind::Success);
        }
    }

    pub fn vote_sidebar_poll(&mut self, index: usize) {
        if self.sidebar_poll.vote_index(index) {
            let key = self.sidebar_poll.key().to_string();
            let choice = self.sidebar_poll.voted().unwrap_or_default().to_string();
            let saved = self.store.set_poll_vote(&key, &choice);
            self.persisted(saved);
            self.show_toast("Thanks for voting!", ToastKind::Success);
        }
    }

    // ==================== Comments ====================

    pub fn start_comment(&mut self) {
        if self.article.is_some() {
            self.composer = Some(Composer::new(None));
        }
    }

    /// Open or close the reply composer under the highlighted comment.
    pub fn toggle_reply(&mut self) {
        let Some(view) = self.article.as_mut() else {
            return;
        };
        let Some(id) = view.selected_comment() else {
            return;
        };
        if let Err(e) = view.comments.toggle_reply(id) {
            tracing::warn!("Cannot reply: {}", e);
            return;
        }
        self.composer = view
            .comments
            .active_reply()
            .map(|id| Composer::new(Some(id)));
    }

    pub fn cancel_compose(&mut self) {
        if let Some(view) = self.article.as_mut() {
            view.comments.cancel_reply();
        }
        self.composer = None;
    }

    pub fn submit_compose(&mut self) {
        let (Some(view), Some(composer)) = (self.article.as_mut(), self.composer.as_ref()) else {
            return;
        };
        let result = match composer.reply_to {
            Some(_) => view.comments.submit_reply(&composer.author, &composer.text),
            None => view
                .comments
                .add_top_level_comment(&composer.author, &composer.text),
        };
        match result {
            Ok(id) => {
                tracing::debug!("Posted comment {}", id);
                self.composer = None;
                self.show_toast("Comment posted", ToastKind::Success);
            }
            Err(AppError::InvalidInput(_)) => {
                self.show_toast("Please enter your name and a comment", ToastKind::Error);
            }
            Err(e) => {
                tracing::warn!("Failed to post comment: {}", e);
                self.composer = None;
                self.show_toast("Could not post comment", ToastKind::Error);
            }
        }
    }

    // ==================== Timers ====================

    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast {
            message: message.to_string(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_DURATION)
        {
            self.toast = None;
        }
        self.ticker_offset = self.ticker_offset.wrapping_add(1);
    }

    pub fn on_live_update(&mut self, update: LiveUpdate) {
        tracing::info!("Live update: {}", update.message);
        self.live_update = Some(update);
    }

    pub fn dismiss_live_update(&mut self) {
        self.live_update = None;
    }

    // ==================== Input ====================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.composer.is_some() {
            self.handle_compose_key(key);
        } else if self.search.is_some() {
            self.handle_search_key(key);
        } else if self.article.is_some() {
            self.handle_article_key(key);
        } else {
            self.handle_feed_key(key);
        }
    }

    fn handle_global_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search = Some(SearchState::default()),
            KeyCode::Char('d') => self.toggle_dark_mode(),
            KeyCode::Char('v') => self.set_view(self.view.cycle()),
            KeyCode::Char('x') => self.dismiss_live_update(),
            _ => return false,
        }
        true
    }

    fn handle_feed_key(&mut self, key: KeyEvent) {
        if self.handle_global_key(key.code) {
            return;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter => {
                if let Some(article) = self.selected_article().cloned() {
                    self.open_article(article);
                }
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.select_category(self.category.next())
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.select_category(self.category.prev())
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_article().map(|a| a.id.clone()) {
                    self.toggle_save(&id);
                }
            }
            KeyCode::Char('o') => {
                self.sort = self.sort.cycle();
                self.selected = 0;
            }
            KeyCode::Char('#') => self.cycle_popular_tag(),
            KeyCode::Char('c') | KeyCode::Esc => self.clear_filters(),
            KeyCode::Char('m') => self.compact = !self.compact,
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char(c @ '1'..='9') => self.vote_sidebar_poll(digit_index(c)),
            _ => {}
        }
    }

    fn handle_article_key(&mut self, key: KeyEvent) {
        if self.handle_global_key(key.code) {
            return;
        }
        let Some(view) = self.article.as_mut() else {
            return;
        };
        let page = view.viewport_height.max(2) as isize - 1;

        match (view.focus, key.code) {
            (_, KeyCode::Esc | KeyCode::Backspace) => self.go_back(),
            (_, KeyCode::Tab) => {
                view.focus = match view.focus {
                    DetailFocus::Body => DetailFocus::Comments,
                    DetailFocus::Comments => DetailFocus::Body,
                }
            }
            (_, KeyCode::Char('s')) => {
                let id = view.article.id.clone();
                self.toggle_save(&id);
            }
            (_, KeyCode::Char('c')) => self.start_comment(),
            (_, KeyCode::Char(c @ '1'..='9')) => self.vote_article_poll(digit_index(c)),
            (_, KeyCode::Char('o')) => {
                if let Some(next) = self.related_articles().first().map(|a| (*a).clone()) {
                    self.open_article(next);
                }
            }
            (DetailFocus::Body, KeyCode::Char('j') | KeyCode::Down) => view.scroll_by(1),
            (DetailFocus::Body, KeyCode::Char('k') | KeyCode::Up) => view.scroll_by(-1),
            (DetailFocus::Body, KeyCode::PageDown | KeyCode::Char(' ')) => view.scroll_by(page),
            (DetailFocus::Body, KeyCode::PageUp) => view.scroll_by(-page),
            (DetailFocus::Body, KeyCode::Char('g') | KeyCode::Home) => view.scroll_to(0),
            (DetailFocus::Body, KeyCode::Char('G') | KeyCode::End) => view.scroll_to(usize::MAX),
            (DetailFocus::Body, KeyCode::Char('n')) => view.jump_heading(true),
            (DetailFocus::Body, KeyCode::Char('p')) => view.jump_heading(false),
            (DetailFocus::Body, KeyCode::Char('#')) => view.cycle_tag(),
            (DetailFocus::Body, KeyCode::Char('t')) => view.cycle_toc(),
            (DetailFocus::Body, KeyCode::Enter) => {
                if view.jump_to_toc_entry() {
                    return;
                }
                let tag = view.tag_cursor.and_then(|i| view.article.tags.get(i).cloned());
                if let Some(tag) = tag {
                    self.select_tag(&tag);
                }
            }
            (DetailFocus::Comments, KeyCode::Char('j') | KeyCode::Down) => view.move_comment_cursor(1),
            (DetailFocus::Comments, KeyCode::Char('k') | KeyCode::Up) => view.move_comment_cursor(-1),
            (DetailFocus::Comments, KeyCode::Char('r')) => self.toggle_reply(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let suggestion_count = self.search_suggestions().len();
        let recent_count = self.recent_searches.len();
        let Some(search) = self.search.as_mut() else {
            return;
        };
        let choices = if search.input.is_empty() {
            recent_count
        } else {
            suggestion_count
        };

        match key.code {
            KeyCode::Esc => self.search = None,
            KeyCode::Down => {
                search.cursor = match search.cursor {
                    _ if choices == 0 => None,
                    None => Some(0),
                    Some(i) => Some((i + 1).min(choices - 1)),
                }
            }
            KeyCode::Up => {
                search.cursor = match search.cursor {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                }
            }
            KeyCode::Backspace => {
                search.input.pop();
                search.cursor = None;
            }
            KeyCode::Char(c) => {
                search.input.push(c);
                search.cursor = None;
            }
            KeyCode::Enter => {
                let cursor = search.cursor;
                let input = search.input.clone();
                match cursor {
                    Some(i) if input.is_empty() => {
                        if let Some(term) = self.recent_searches.get(i).cloned() {
                            self.submit_search(&term);
                        }
                    }
                    Some(i) => {
                        let article = self.search_suggestions().get(i).map(|a| (*a).clone());
                        if let Some(article) = article {
                            self.open_article(article);
                        }
                    }
                    None => self.submit_search(&input),
                }
            }
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        let Some(composer) = self.composer.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.cancel_compose(),
            KeyCode::Tab | KeyCode::BackTab => composer.switch_field(),
            KeyCode::Enter => match composer.field {
                ComposeField::Author => composer.field = ComposeField::Text,
                ComposeField::Text => self.submit_compose(),
            },
            KeyCode::Backspace => {
                composer.active_field().pop();
            }
            KeyCode::Char(c) => composer.active_field().push(c),
            _ => {}
        }
    }
}

/// Step an optional cursor through `count` entries, ending back at `None`.
fn cycle_cursor(cursor: Option<usize>, count: usize) -> Option<usize> {
    match cursor {
        _ if count == 0 => None,
        None => Some(0),
        Some(i) if i + 1 < count => Some(i + 1),
        Some(_) => None,
    }
}

fn digit_index(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d.saturating_sub(1) as usize)
}
