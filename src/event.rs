use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::models::GameKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(GameKey),
    Tick,
    Resize,
}

/// Reads terminal events on a dedicated capture thread and hands them to the
/// state-owning loop over a channel, mixed with a steady tick for the typing
/// scheduler. Capture-side errors are logged here and never cross the thread.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, panic_key: char, bomb: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            if let Some(mapped) =
                                map_key(key.code, key.modifiers, panic_key, bomb)
                            {
                                if tx.send(AppEvent::Key(mapped)).is_err() {
                                    break;
                                }
                            }
                        }
                        Ok(Event::Resize(_, _)) => {
                            if tx.send(AppEvent::Resize).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(err) => log::warn!("key capture failed: {err}"),
                    },
                    Ok(false) => {}
                    Err(err) => log::warn!("event poll failed: {err}"),
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(AppEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });
        Self { rx }
    }

    /// Blocks until the capture thread produces the next event.
    pub fn next(&self) -> Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

fn map_key(code: KeyCode, mods: KeyModifiers, panic_key: char, bomb: bool) -> Option<GameKey> {
    match code {
        KeyCode::Esc => Some(GameKey::Quit),
        KeyCode::Char('q') if mods.contains(KeyModifiers::CONTROL) => Some(GameKey::Quit),
        KeyCode::F(8) => Some(GameKey::Quit),
        KeyCode::F(7) => Some(GameKey::ToggleHide),
        KeyCode::F(6) => Some(GameKey::NewRound),
        KeyCode::Tab => Some(GameKey::Tab),
        KeyCode::Backspace => Some(GameKey::Backspace),
        KeyCode::Enter => Some(GameKey::Enter),
        KeyCode::Char(c) if bomb && c == panic_key => Some(GameKey::Panic),
        KeyCode::Char(c) => Some(GameKey::Char(c)),
        _ => None,
    }
}
