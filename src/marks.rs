/// Per-letter status of the current word while it is being typed.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Incorrect,
    Pending,
}

/// Status of a whole word in the visible window.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Correct,
    Incorrect,
}

/// Mark every letter of `target` against the text typed so far.
///
/// Overshooting the target marks every letter incorrect.
pub fn letter_marks(target: &str, typed: &str) -> Vec<Mark> {
    let typed: Vec<char> = typed.chars().collect();
    let target_len = target.chars().count();

    if typed.len() > target_len {
        return vec![Mark::Incorrect; target_len];
    }

    target
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            None => Mark::Pending,
            Some(&c) if c == expected => Mark::Correct,
            Some(_) => Mark::Incorrect,
        })
        .collect()
}
