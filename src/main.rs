// src/main.rs
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute, terminal,
};
use ratatui::prelude::*;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod config;
mod controller;
mod models;
mod network;
mod theme;
mod ui;
mod utils;

use crate::config::Settings;
use crate::controller::PopupCycle;
use crate::models::FetchSlot;
use crate::network::OrderClient;
use crate::ui::PopupView;

#[derive(Parser)]
#[command(name = "justbought", about = "Rotating recent-purchase notification popup")]
struct Args {
    /// Order endpoint URL (overrides config file and environment).
    #[arg(long)]
    endpoint: Option<String>,
    /// Anti-forgery token expected by the order endpoint.
    #[arg(long)]
    token: Option<String>,
    /// Load records from a local JSON file instead of fetching.
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr only, gated by RUST_LOG; end users see none
    // of it.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::ERROR.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = Settings::new()?;
    if args.endpoint.is_some() {
        settings.endpoint = args.endpoint.clone();
    }
    if args.token.is_some() {
        settings.token = args.token.clone();
    }

    let slot = Arc::new(Mutex::new(FetchSlot::Pending));
    spawn_fetch(&args, &settings, Arc::clone(&slot));

    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, slot);

    execute!(terminal.backend_mut(), DisableMouseCapture)?;
    terminal::disable_raw_mode()?;
    res
}

/// Kicks off the one background fetch for this session; its outcome lands
/// in the shared slot polled by the event loop. Every failure terminates
/// here: the popup simply never starts.
fn spawn_fetch(args: &Args, settings: &Settings, slot: Arc<Mutex<FetchSlot>>) {
    if let Some(path) = args.fixture.clone() {
        tokio::spawn(async move {
            let outcome = match network::load_fixture(&path) {
                Ok(records) => {
                    debug!(count = records.len(), "fixture loaded");
                    FetchSlot::Ready(records)
                }
                Err(err) => {
                    error!(error = %err, "failed to load fixture");
                    FetchSlot::Failed
                }
            };
            *slot.lock().unwrap() = outcome;
        });
        return;
    }

    let client = match OrderClient::new(settings) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "order fetch not started");
            *slot.lock().unwrap() = FetchSlot::Failed;
            return;
        }
    };
    tokio::spawn(async move {
        let outcome = match client.fetch_orders().await {
            Ok(records) => {
                debug!(count = records.len(), "orders loaded");
                FetchSlot::Ready(records)
            }
            Err(err) => {
                error!(error = %err, "failed to fetch orders");
                FetchSlot::Failed
            }
        };
        *slot.lock().unwrap() = outcome;
    });
}

fn run<B: Backend>(terminal: &mut Terminal<B>, slot: Arc<Mutex<FetchSlot>>) -> Result<()> {
    let mut cycle = PopupCycle::new();
    let mut view = PopupView::default();
    let mut settled = false;

    loop {
        let frame_area = terminal.draw(|f| ui::draw(f, &view, cycle.phase()))?.area;

        // Hand the fetch outcome over exactly once. A failed fetch leaves
        // the cycle unstarted, so navigation keys stay no-ops.
        if !settled {
            let mut pending = slot.lock().unwrap();
            match std::mem::replace(&mut *pending, FetchSlot::Pending) {
                FetchSlot::Ready(records) => {
                    cycle.start(records, Instant::now());
                    settled = true;
                }
                FetchSlot::Failed => settled = true,
                FetchSlot::Pending => {}
            }
        }

        if event::poll(poll_timeout(cycle.next_deadline()))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }
                    let now = Instant::now();
                    match key_event.code {
                        KeyCode::Left | KeyCode::Char('h') => {
                            view.apply(cycle.navigate_previous(now))
                        }
                        KeyCode::Right | KeyCode::Char('l') => {
                            view.apply(cycle.navigate_next(now))
                        }
                        KeyCode::Char('c') | KeyCode::Esc => view.apply(cycle.dismiss()),
                        KeyCode::Char('r') => view.apply(cycle.reset_manual_hide(now)),
                        KeyCode::Char('q') => break,
                        _ => {}
                    }
                }
                // A click anywhere outside the popup counts as closing it.
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Down(_)) && view.is_visible() {
                        let popup =
                            ui::popup_rect(frame_area, ui::POPUP_WIDTH, ui::POPUP_HEIGHT);
                        let click = Position::new(mouse.column, mouse.row);
                        if !popup.contains(click) {
                            view.apply(cycle.dismiss());
                        }
                    }
                }
                _ => {}
            }
        }

        view.apply(cycle.tick(Instant::now()));
    }

    Ok(())
}

/// How long the loop may block on input: until the next controller
/// deadline, capped so the fetch slot stays responsive.
fn poll_timeout(deadline: Option<Instant>) -> Duration {
    let cap = Duration::from_millis(200);
    match deadline {
        Some(at) => at.saturating_duration_since(Instant::now()).min(cap),
        None => cap,
    }
}
