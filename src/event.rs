use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::{LiveUpdate, LiveUpdateKind};
use crate::error::Result;
use crate::models::{Article, Category};

pub enum AppEvent {
    Input(Event),
    Tick,
    ArticlesLoaded {
        generation: u64,
        category: Category,
        result: Result<Vec<Article>>,
    },
    LiveUpdate(LiveUpdate),
}

/// Funnels terminal input, ticks, fetch results and timers into one queue
/// so state changes are applied one at a time.
pub struct EventHandler {
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let input_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut ticker = tokio::time::interval(tick_rate);
            loop {
                let event = tokio::select! {
                    _ = ticker.tick() => AppEvent::Tick,
                    maybe = reader.next() => match maybe {
                        Some(Ok(event)) => AppEvent::Input(event),
                        Some(Err(e)) => {
                            tracing::warn!("Terminal input error: {}", e);
                            continue;
                        }
                        None => break,
                    },
                };
                if input_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Fire-once timers for the simulated live update banners.
pub fn schedule_live_updates(tx: &UnboundedSender<AppEvent>, breaking: Duration, update: Duration) {
    let timers = [
        (
            breaking,
            LiveUpdate {
                message: "BREAKING: Quantum computing breakthrough announced by leading research lab."
                    .to_string(),
                kind: LiveUpdateKind::Breaking,
            },
        ),
        (
            update,
            LiveUpdate {
                message: "A new AI-focused article has just been published. Check out the \"Latest\" section!"
                    .to_string(),
                kind: LiveUpdateKind::Update,
            },
        ),
    ];

    for (delay, update) in timers {
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::LiveUpdate(update));
        });
    }
}
