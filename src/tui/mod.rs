//! Terminal front end
//!
//! Raw mode and the alternate screen are held by [`TerminalGuard`] for the
//! lifetime of the UI. Key presses are read on their own thread and posted to
//! the event queue as [`Event`]s.

pub mod theme;
pub mod view;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::AppResult;
use crate::messaging::{Event, KeyInput};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Restores the terminal when dropped, including on early returns and panics
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> AppResult<Self> {
        enable_raw_mode().context("failed enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed entering alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

pub fn init_terminal() -> AppResult<AppTerminal> {
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend).context("failed creating terminal")
}

/// Translate a terminal key press into a wizard event
pub fn map_key(key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Event::Cancel),
            _ => None,
        };
    }

    let input = match key.code {
        KeyCode::Esc => return Some(Event::Cancel),
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Char(c) => KeyInput::Char(c),
        _ => return None,
    };
    Some(Event::Key(input))
}

/// Background reader forwarding key presses to the event queue
pub struct InputThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputThread {
    pub fn spawn(events: Sender<Event>) -> AppResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("terminal-input".to_string())
            .spawn(move || {
                if let Err(e) = forward_keys(&events, &flag) {
                    tracing::error!("Terminal input failed: {}", e);
                    // Without input the user could not quit; end the run
                    let _ = events.send(Event::Cancel);
                }
            })
            .context("failed spawning input thread")?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

fn forward_keys(events: &Sender<Event>, stop: &AtomicBool) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if let Some(event) = map_key(key) {
            if events.send(event).is_err() {
                break;
            }
        }
    }
    Ok(())
}

impl Drop for InputThread {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
