use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, info};

use crate::score::ROUND_SECS;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // release/repeat events would double-submit on some terminals
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(%err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Idle,
    Running { deadline: Instant },
    Expired,
}

/// Round timer. Driven by polling with the current instant so the event loop
/// decides when time is observed.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total: Duration,
    state: CountdownState,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Duration::from_secs(ROUND_SECS))
    }
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            state: CountdownState::Idle,
        }
    }

    /// Start counting down. Arming a running or expired countdown does nothing.
    pub fn arm(&mut self, now: Instant) {
        if self.state == CountdownState::Idle {
            self.state = CountdownState::Running {
                deadline: now + self.total,
            };
            info!(secs = self.total.as_secs(), "countdown started");
        }
    }

    /// Back to idle. Cancelling an idle countdown is a no-op.
    pub fn cancel(&mut self) {
        if self.state != CountdownState::Idle {
            debug!("countdown cancelled");
        }
        self.state = CountdownState::Idle;
    }

    /// Returns true exactly once, on the first poll at or past the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            CountdownState::Running { deadline } if now >= deadline => {
                self.state = CountdownState::Expired;
                info!("countdown expired");
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    pub fn has_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }

    /// Whole seconds left, rounded up.
    pub fn seconds_left(&self, now: Instant) -> u64 {
        let remaining = match self.state {
            CountdownState::Idle => self.total,
            CountdownState::Running { deadline } => deadline.saturating_duration_since(now),
            CountdownState::Expired => Duration::ZERO,
        };
        (remaining.as_millis() as u64).div_ceil(1000)
    }
}
