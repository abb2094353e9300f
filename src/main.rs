use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typesprint::{
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ui::AppView,
    word_source::{CorpusWordSource, SupportedLanguage},
    TICK_RATE_MS,
};

/// one minute typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type as many of the scrolling random words as you can in sixty seconds, then see your raw and corrected characters per minute and words per minute."
)]
pub struct Cli {
    /// word list to draw from (defaults to the saved config, else english)
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// seed the word order for a reproducible round
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// remember the chosen language as the default
    #[clap(long)]
    save_config: bool,
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typesprint=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn build_app(cli: &Cli) -> Result<App, Box<dyn Error>> {
    let store = FileConfigStore::new();
    let mut config = store.load();

    if let Some(language) = cli.language {
        config.language = language;
    }
    if cli.save_config {
        if let Err(err) = store.save(&config) {
            warn!(%err, path = %store.path().display(), "could not save config");
        }
    }

    let corpus = config.language.corpus()?;
    info!(language = %config.language, words = corpus.words.len(), seed = ?cli.seed, "corpus loaded");
    let source = match cli.seed {
        Some(seed) => CorpusWordSource::seeded(corpus, seed)?,
        None => CorpusWordSource::new(corpus)?,
    };

    Ok(App::new(source)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    let mut app = build_app(&cli)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(AppView::new(app, Instant::now()), f.area()))?;

        match runner.step() {
            AppEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    let score = app.session.score();
                    info!(
                        raw_cpm = score.raw_cpm,
                        cpm = score.corrected_cpm,
                        wpm = score.wpm,
                        "round finished"
                    );
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now())? == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
