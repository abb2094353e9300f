// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod marks;
pub mod runtime;
pub mod score;
pub mod session;
pub mod ui;
pub mod word_source;

pub use error::{Error, Result};

pub const TICK_RATE_MS: u64 = 100;
