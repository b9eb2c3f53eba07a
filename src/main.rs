mod app;
mod config;
mod content;
mod error;
mod event;
mod feed_query;
mod models;
mod source;
mod store;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::cursor::Show;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedSender;
use tracing_subscriber::EnvFilter;

use app::{App, FetchRequest};
use config::Config;
use event::{AppEvent, EventHandler};
use source::ArticleSource;
use store::Store;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("Starting newsdesk {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let store = Store::open(&config.store_path)?;
    let source = source::from_config(&config)?;
    let app = App::new(store);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, app, source, &config).await;
    restore_terminal()?;

    if let Err(e) = &result {
        tracing::error!("Exited with error: {}", e);
    }
    tracing::info!("Goodbye");
    Ok(result?)
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging() -> anyhow::Result<()> {
    let log_path = Config::log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "newsdesk=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Put the terminal back and tell the user to restart. State is not kept.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        tracing::error!("Panic: {}", info);
        eprintln!();
        eprintln!("  Something went wrong.");
        eprintln!();
        eprintln!("  newsdesk ran into an unexpected error and had to stop.");
        eprintln!("  Please restart the application.");
        eprintln!();
        default_hook(info);
    }));
}

fn spawn_fetch(tx: &UnboundedSender<AppEvent>, source: Arc<dyn ArticleSource>, request: FetchRequest) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = source.fetch(request.category).await;
        let _ = tx.send(AppEvent::ArticlesLoaded {
            generation: request.generation,
            category: request.category,
            result,
        });
    });
}

async fn run(
    terminal: &mut Tui,
    mut app: App,
    source: Arc<dyn ArticleSource>,
    config: &Config,
) -> error::Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(config.tick_rate_ms.max(16)));
    let tx = events.sender();
    event::schedule_live_updates(
        &tx,
        Duration::from_secs(config.breaking_news_delay_secs),
        Duration::from_secs(config.content_update_delay_secs),
    );

    loop {
        if let Some(request) = app.take_fetch_request() {
            spawn_fetch(&tx, Arc::clone(&source), request);
        }

        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        let Some(event) = events.next().await else {
            break;
        };
        match event {
            AppEvent::Input(Event::Key(key)) => app.handle_key(key),
            AppEvent::Input(_) => {}
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::ArticlesLoaded {
                generation,
                category,
                result,
            } => app.on_articles_loaded(generation, category, result),
            AppEvent::LiveUpdate(update) => app.on_live_update(update),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
