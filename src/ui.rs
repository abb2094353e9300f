use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    marks::{Mark, WordStatus},
    word_source::WordSource,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const WORDS_PER_ROW: usize = 5;

/// Renders an [`App`] as seen at `now`.
pub struct AppView<'a, S: WordSource> {
    pub app: &'a App<S>,
    pub now: Instant,
}

impl<'a, S: WordSource> AppView<'a, S> {
    pub fn new(app: &'a App<S>, now: Instant) -> Self {
        Self { app, now }
    }
}

impl<S: WordSource> Widget for AppView<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.app.state {
            AppState::Waiting | AppState::Typing => render_typing(self.app, self.now, area, buf),
            AppState::Results => render_results(self.app, area, buf),
        }
    }
}

fn mark_style(mark: Mark) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match mark {
        Mark::Correct => bold.fg(Color::Green),
        Mark::Incorrect => bold.fg(Color::Red),
        Mark::Pending => bold,
    }
}

fn word_style(status: WordStatus) -> Style {
    match status {
        WordStatus::Pending => Style::default(),
        WordStatus::Correct => Style::default().fg(Color::Blue),
        WordStatus::Incorrect => Style::default().fg(Color::Red),
    }
}

fn render_typing<S: WordSource>(app: &App<S>, now: Instant, area: Rect, buf: &mut Buffer) {
    let dim_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);

    let window_rows = app
        .session
        .visible_window()
        .len()
        .div_ceil(WORDS_PER_ROW) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),           // timer
            Constraint::Length(1),           // "type here"
            Constraint::Length(2),           // pending input
            Constraint::Length(2),           // current word
            Constraint::Length(window_rows), // word window
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("{}s", app.seconds_left(now)),
        dim_bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let prompt = match app.state {
        AppState::Waiting => "Start typing to begin",
        _ => "Type here",
    };
    Paragraph::new(prompt)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Line::from(vec![
        Span::raw(app.input.as_str()),
        Span::styled("_", dim_bold_style),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    if let Some(word) = app.session.current_word() {
        let spans: Vec<Span> = word
            .chars()
            .zip(app.current_marks())
            .map(|(c, mark)| Span::styled(c.to_string(), mark_style(mark)))
            .collect();
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    render_window(app, chunks[4], buf);

    Paragraph::new(Span::styled(
        "(tab) restart / (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn render_window<S: WordSource>(app: &App<S>, area: Rect, buf: &mut Buffer) {
    let window = app.session.visible_window();
    let current = app.session.current_word();
    let column_width = window.iter().map(|w| w.width()).max().unwrap_or(0) + 2;

    let lines: Vec<Line> = window
        .chunks(WORDS_PER_ROW)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|word| {
                    let mut style = word_style(app.session.word_status(word));
                    if current == Some(word.as_str()) {
                        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                    }
                    Span::styled(format!("{word:^column_width$}"), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_results<S: WordSource>(app: &App<S>, area: Rect, buf: &mut Buffer) {
    let score = app.session.score();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Results",
        bold_style.add_modifier(Modifier::UNDERLINED),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let rows = [
        format!("Raw CPM: {}", score.raw_cpm),
        format!("Corrected CPM: {}", score.corrected_cpm),
        format!("WPM: {}", score.wpm),
    ];
    for (text, chunk) in rows.into_iter().zip(&chunks[1..4]) {
        Paragraph::new(Span::styled(text, bold_style))
            .alignment(Alignment::Center)
            .render(*chunk, buf);
    }

    Paragraph::new(Span::styled(
        "(r)estart / (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
