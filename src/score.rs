/// Length of every round. Scores are per minute, so with a one minute round
/// the counts are already rates.
pub const ROUND_SECS: u64 = 60;

/// Standard characters-per-word convention for WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub raw_cpm: usize,
    pub corrected_cpm: usize,
    pub wpm: usize,
}

impl Score {
    pub fn from_counts(raw_chars: usize, correct_chars: usize) -> Self {
        let minutes = ROUND_SECS as f64 / 60.0;
        let corrected_cpm = (correct_chars as f64 / minutes).round() as usize;

        Self {
            raw_cpm: (raw_chars as f64 / minutes).round() as usize,
            corrected_cpm,
            wpm: (corrected_cpm as f64 / CHARS_PER_WORD).round() as usize,
        }
    }
}
