//! Simulator run loop.

use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use webstream_proto::config::Config;
use webstream_ui::session::Session;

use super::keymap::{KeyMapper, KeyRoute};
use super::loopback::LoopbackHost;
use super::prompt::PromptEntry;
use super::view::TerminalDisplay;

pub async fn run(config: Config) -> anyhow::Result<()> {
    debug!("run(): enabling raw mode");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    debug!("run(): terminal created, size={:?}", terminal.size());

    let mut display = TerminalDisplay::new(terminal);
    let mut host = LoopbackHost::new();
    let mut session = Session::new(&config, PromptEntry::new());
    let mut keys = KeyMapper::new();
    session.init(&mut host);

    // ── Background task: keyboard events ──────────────────────────────────────
    let (tx, mut rx) = mpsc::channel::<Event>(256);
    tokio::task::spawn_blocking(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.blocking_send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(config.timing.tick_ms.max(1)));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // ── Main loop ─────────────────────────────────────────────────────────────
    loop {
        tokio::select! {
            Some(ev) = rx.recv() => {
                match ev {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match keys.map(key, session.is_text_entry_active()) {
                            KeyRoute::Midi(msgs) => {
                                for msg in msgs {
                                    session.handle_midi_internal(&mut host, &msg);
                                }
                            }
                            KeyRoute::Type(key) => session.text_entry_mut().handle_key(key),
                            KeyRoute::Quit => break,
                            KeyRoute::None => {}
                        }
                    }
                    Event::Resize(_, _) => session.request_redraw(),
                    _ => {}
                }
            }

            _ = tick.tick() => {
                host.step(Instant::now());
                session.tick(&mut host, &mut display);
            }
        }

        if host.exit_requested() {
            info!("back pressed at root; leaving");
            break;
        }
    }

    // ── Teardown ──────────────────────────────────────────────────────────────
    disable_raw_mode()?;
    let terminal = display.terminal_mut();
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("webstream exiting");

    Ok(())
}
