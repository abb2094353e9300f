use std::collections::{HashMap, HashSet};

use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::marks::WordStatus;
use crate::score::Score;
use crate::word_source::WordSource;

pub const INITIAL_WORDS: usize = 50;
pub const TOP_UP_WORDS: usize = 10;
/// Words left ahead of the cursor that trigger a top-up.
pub const LOOKAHEAD: usize = 15;
pub const WINDOW_SIZE: usize = 15;
/// Position inside the cached window at which the window scrolls.
pub const RECENTER_AT: usize = 11;
/// Words kept behind the current one after a scroll.
pub const WORDS_BEHIND: usize = 6;
/// Draws allowed per unique word before the source is declared exhausted.
pub const MAX_DRAW_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// One round of the typing test: the self-extending word list, the cursor,
/// what the user typed for each word and the visible window.
#[derive(Debug)]
pub struct Session<S: WordSource> {
    source: S,
    phase: Phase,
    words: Vec<String>,
    taken: HashSet<String>,
    cursor: usize,
    submissions: HashMap<String, String>,
    window_start: usize,
}

impl<S: WordSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            phase: Phase::Idle,
            words: Vec::new(),
            taken: HashSet::new(),
            cursor: 0,
            submissions: HashMap::new(),
            window_start: 0,
        }
    }

    /// Throw away the current round and begin a new one.
    ///
    /// On error the previous state is left untouched.
    pub fn start(&mut self) -> Result<()> {
        let words = draw_unique(&mut self.source, &HashSet::new(), INITIAL_WORDS)?;

        self.taken = words.iter().cloned().collect();
        self.words = words;
        self.cursor = 0;
        self.window_start = 0;
        self.submissions.clear();
        self.phase = Phase::Running;

        info!(words = self.words.len(), "session started");
        Ok(())
    }

    /// Record `text` as the user's attempt at the current word and move on.
    pub fn submit_word(&mut self, text: &str) -> Result<()> {
        if self.phase != Phase::Running {
            return Err(Error::NotRunning);
        }

        let next = self.cursor + 1;
        if self.words.len() - next == LOOKAHEAD {
            let batch = draw_unique(&mut self.source, &self.taken, TOP_UP_WORDS)?;
            self.taken.extend(batch.iter().cloned());
            self.words.extend(batch);
            debug!(len = self.words.len(), cursor = next, "word list topped up");
        }

        let typed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let target = self.words[self.cursor].clone();
        trace!(%target, %typed, "word submitted");
        self.submissions.insert(target, typed);
        self.cursor = next;

        if self.cursor - self.window_start == RECENTER_AT {
            self.window_start = self.cursor - WORDS_BEHIND;
            debug!(start = self.window_start, "window recentred");
        }

        Ok(())
    }

    /// Freeze the round. Only a running session changes phase.
    pub fn finish(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Finished;
            info!(
                submitted = self.cursor,
                raw = self.raw_character_count(),
                correct = self.correct_character_count(),
                "session finished"
            );
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.cursor).map(String::as_str)
    }

    /// The 15 words currently on screen; empty before the first start.
    pub fn visible_window(&self) -> &[String] {
        self.words
            .get(self.window_start..self.window_start + WINDOW_SIZE)
            .unwrap_or(&[])
    }

    pub fn submission(&self, word: &str) -> Option<&str> {
        self.submissions.get(word).map(String::as_str)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    pub fn word_status(&self, word: &str) -> WordStatus {
        match self.submissions.get(word) {
            None => WordStatus::Pending,
            Some(typed) if typed == word => WordStatus::Correct,
            Some(_) => WordStatus::Incorrect,
        }
    }

    /// Characters typed, right or wrong.
    pub fn raw_character_count(&self) -> usize {
        self.submissions.values().map(|s| s.chars().count()).sum()
    }

    /// Characters of words typed exactly right. No partial credit.
    pub fn correct_character_count(&self) -> usize {
        self.submissions
            .iter()
            .filter(|(target, typed)| target == typed)
            .map(|(target, _)| target.chars().count())
            .sum()
    }

    pub fn score(&self) -> Score {
        Score::from_counts(self.raw_character_count(), self.correct_character_count())
    }
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && !word.chars().any(char::is_whitespace)
}

/// Rejection-sample `count` valid words not in `taken` and distinct from
/// each other.
fn draw_unique<S: WordSource>(
    source: &mut S,
    taken: &HashSet<String>,
    count: usize,
) -> Result<Vec<String>> {
    let mut batch: Vec<String> = Vec::with_capacity(count);

    while batch.len() < count {
        let mut attempts = 0;
        loop {
            if attempts == MAX_DRAW_ATTEMPTS {
                return Err(Error::SourceExhausted { attempts });
            }
            attempts += 1;

            let word = source.generate_word()?;
            if !is_valid_word(&word) {
                trace!(?word, "rejected malformed word");
                continue;
            }
            if taken.contains(&word) || batch.contains(&word) {
                trace!(%word, "rejected duplicate word");
                continue;
            }
            batch.push(word);
            break;
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word_source::ScriptedWordSource;
    use assert_matches::assert_matches;

    fn numbered(n: usize) -> ScriptedWordSource {
        ScriptedWordSource::new((0..n).map(|i| format!("w{i}")))
    }

    fn started(source: ScriptedWordSource) -> Session<ScriptedWordSource> {
        let mut session = Session::new(source);
        session.start().unwrap();
        session
    }

    fn submit_n<S: WordSource>(session: &mut Session<S>, n: usize) {
        for _ in 0..n {
            session.submit_word("nope").unwrap();
        }
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new(numbered(100));

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.current_word(), None);
        assert!(session.visible_window().is_empty());
        assert_eq!(session.raw_character_count(), 0);
    }

    #[test]
    fn test_start_builds_initial_batch() {
        let session = started(numbered(1000));

        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.words().len(), INITIAL_WORDS);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.current_word(), Some("w0"));
        assert_eq!(session.visible_window(), &session.words()[0..15]);
        assert_eq!(session.submission_count(), 0);
    }

    #[test]
    fn test_correct_word_scores_its_length() {
        let mut session = started(ScriptedWordSource::new(
            std::iter::once("cat".to_string()).chain((0..100).map(|i| format!("w{i}"))),
        ));

        session.submit_word("cat").unwrap();

        assert_eq!(session.correct_character_count(), 3);
        assert_eq!(session.raw_character_count(), 3);
        assert_eq!(session.word_status("cat"), WordStatus::Correct);
    }

    #[test]
    fn test_wrong_word_scores_raw_only() {
        let mut session = started(ScriptedWordSource::new(
            std::iter::once("cat".to_string()).chain((0..100).map(|i| format!("w{i}"))),
        ));

        session.submit_word("xyz").unwrap();

        assert_eq!(session.raw_character_count(), 3);
        assert_eq!(session.correct_character_count(), 0);
        assert_eq!(session.word_status("cat"), WordStatus::Incorrect);
        assert_eq!(session.submission("cat"), Some("xyz"));
    }

    #[test]
    fn test_whitespace_is_stripped_from_submissions() {
        let mut session = started(numbered(100));

        session.submit_word(" w 0\t").unwrap();

        assert_eq!(session.submission("w0"), Some("w0"));
        assert_eq!(session.correct_character_count(), 2);
    }

    #[test]
    fn test_empty_submission_counts_as_wrong() {
        let mut session = started(numbered(100));

        session.submit_word("   ").unwrap();

        assert_eq!(session.submission("w0"), Some(""));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.raw_character_count(), 0);
        assert_eq!(session.word_status("w0"), WordStatus::Incorrect);
        assert_eq!(session.word_status("w1"), WordStatus::Pending);
    }

    #[test]
    fn test_submit_before_start_fails() {
        let mut session = Session::new(numbered(100));

        assert_matches!(session.submit_word("w0"), Err(Error::NotRunning));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_finished_session_is_read_only() {
        let mut session = started(numbered(100));
        session.submit_word("w0").unwrap();
        session.finish();
        session.finish();

        assert_eq!(session.phase(), Phase::Finished);
        assert_matches!(session.submit_word("w1"), Err(Error::NotRunning));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.correct_character_count(), 2);
    }

    #[test]
    fn test_finish_before_start_stays_idle() {
        let mut session = Session::new(numbered(100));
        session.finish();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_top_up_after_35th_submission() {
        let mut session = started(numbered(1000));

        submit_n(&mut session, 34);
        assert_eq!(session.words().len(), 50);

        session.submit_word("nope").unwrap();
        assert_eq!(session.cursor(), 35);
        assert_eq!(session.words().len(), 60);

        submit_n(&mut session, 10);
        assert_eq!(session.words().len(), 70);
    }

    #[test]
    fn test_window_scrolls_in_bursts() {
        let mut session = started(numbered(1000));
        let window_at = |s: &Session<ScriptedWordSource>, start: usize| {
            assert_eq!(s.visible_window(), &s.words()[start..start + WINDOW_SIZE]);
        };

        submit_n(&mut session, 10);
        window_at(&session, 0);

        session.submit_word("nope").unwrap();
        assert_eq!(session.cursor(), 11);
        window_at(&session, 5);

        submit_n(&mut session, 4);
        window_at(&session, 5);

        session.submit_word("nope").unwrap();
        assert_eq!(session.cursor(), 16);
        window_at(&session, 10);

        submit_n(&mut session, 5);
        window_at(&session, 15);
    }

    #[test]
    fn test_current_word_stays_inside_window() {
        let mut session = started(numbered(1000));

        for _ in 0..200 {
            let current = session.current_word().unwrap().to_string();
            assert!(session.visible_window().contains(&current));
            session.submit_word("nope").unwrap();
        }
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = started(numbered(1000));
        submit_n(&mut session, 40);
        session.finish();

        session.start().unwrap();

        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.words().len(), INITIAL_WORDS);
        assert_eq!(session.submission_count(), 0);
        assert_eq!(session.visible_window(), &session.words()[0..15]);
        assert_eq!(session.raw_character_count(), 0);
    }

    #[test]
    fn test_malformed_words_are_skipped() {
        let mut script = Vec::new();
        for i in 0..60 {
            script.push(format!("w{i}"));
            script.push(String::new());
            script.push("two words".to_string());
        }
        let session = started(ScriptedWordSource::new(script));

        assert!(session.words().iter().all(|w| is_valid_word(w)));
        assert_eq!(session.words()[1], "w1");
    }

    #[test]
    fn test_degenerate_source_is_fatal() {
        let mut session = Session::new(ScriptedWordSource::new(["same"]));

        assert_matches!(
            session.start(),
            Err(Error::SourceExhausted { attempts }) if attempts == MAX_DRAW_ATTEMPTS
        );
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_exhausted_top_up_leaves_state_unchanged() {
        let mut session = started(numbered(55));
        submit_n(&mut session, 34);

        assert_matches!(
            session.submit_word("nope"),
            Err(Error::SourceExhausted { .. })
        );
        assert_eq!(session.cursor(), 34);
        assert_eq!(session.submission_count(), 34);
        assert_eq!(session.words().len(), 50);
    }
}
