use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::error::Result;
use crate::marks::{letter_marks, Mark};
use crate::runtime::Countdown;
use crate::session::Session;
use crate::word_source::{CorpusWordSource, WordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Words are shown, the countdown starts on the first keystroke.
    Waiting,
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Presentation state around a [`Session`]: the pending input, the round
/// timer and which screen is showing.
#[derive(Debug)]
pub struct App<S: WordSource = CorpusWordSource> {
    pub session: Session<S>,
    pub countdown: Countdown,
    pub state: AppState,
    pub input: String,
}

impl<S: WordSource> App<S> {
    pub fn new(source: S) -> Result<Self> {
        let mut session = Session::new(source);
        session.start()?;

        Ok(Self {
            session,
            countdown: Countdown::default(),
            state: AppState::Waiting,
            input: String::new(),
        })
    }

    pub fn restart(&mut self) -> Result<()> {
        self.countdown.cancel();
        self.input.clear();
        self.session.start()?;
        self.state = AppState::Waiting;
        info!("restarted");
        Ok(())
    }

    /// Observe the clock. Returns true when this call ended the round.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.state == AppState::Typing && self.countdown.poll(now) {
            self.session.finish();
            self.input.clear();
            self.state = AppState::Results;
            return true;
        }
        false
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Result<KeyOutcome> {
        // a keystroke that lands after the deadline must not count
        self.on_tick(now);

        match key.code {
            KeyCode::Esc => return Ok(KeyOutcome::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(KeyOutcome::Quit)
            }
            KeyCode::Tab => self.restart()?,
            _ => match self.state {
                AppState::Results => {
                    if key.code == KeyCode::Char('r') {
                        self.restart()?;
                    }
                }
                AppState::Waiting | AppState::Typing => self.on_typing_key(key, now)?,
            },
        }

        Ok(KeyOutcome::Continue)
    }

    fn on_typing_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Ok(());
        }

        match key.code {
            KeyCode::Char(' ') => {
                if self.state == AppState::Typing {
                    self.session.submit_word(&self.input)?;
                    self.input.clear();
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.state == AppState::Waiting {
                    self.countdown.arm(now);
                    self.state = AppState::Typing;
                }
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
        Ok(())
    }

    pub fn seconds_left(&self, now: Instant) -> u64 {
        self.countdown.seconds_left(now)
    }

    /// Letter marks for the current word against the pending input.
    pub fn current_marks(&self) -> Vec<Mark> {
        self.session
            .current_word()
            .map(|word| letter_marks(word, &self.input))
            .unwrap_or_default()
    }
}
