use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::collections::VecDeque;

use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Anything that can hand out candidate words to a session.
///
/// Implementations have no memory of earlier draws; rejecting duplicates and
/// malformed words is the caller's job.
pub trait WordSource {
    fn generate_word(&mut self) -> Result<String>;
}

#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    #[default]
    English,
    English1k,
}

impl SupportedLanguage {
    pub fn corpus(&self) -> Result<Corpus> {
        Corpus::load(&self.to_string().to_lowercase())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Corpus {
    /// Load one of the corpora embedded from `src/lang`.
    pub fn load(name: &str) -> Result<Self> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::UnknownCorpus(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::UnknownCorpus(name.to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let corpus: Corpus = from_str(json)?;
        if corpus.words.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(corpus)
    }
}

/// Draws uniformly from a corpus.
#[derive(Debug)]
pub struct CorpusWordSource {
    words: Vec<String>,
    rng: StdRng,
}

impl CorpusWordSource {
    pub fn new(corpus: Corpus) -> Result<Self> {
        Self::with_rng(corpus, StdRng::from_entropy())
    }

    /// Deterministic draws for reproducible sessions.
    pub fn seeded(corpus: Corpus, seed: u64) -> Result<Self> {
        Self::with_rng(corpus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(corpus: Corpus, rng: StdRng) -> Result<Self> {
        if corpus.words.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(Self {
            words: corpus.words,
            rng,
        })
    }
}

impl WordSource for CorpusWordSource {
    fn generate_word(&mut self) -> Result<String> {
        self.words
            .choose(&mut self.rng)
            .map(|w| w.to_lowercase())
            .ok_or(Error::EmptyCorpus)
    }
}

/// Replays a fixed list of words in order, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedWordSource {
    script: VecDeque<String>,
}

impl ScriptedWordSource {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            script: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordSource for ScriptedWordSource {
    fn generate_word(&mut self) -> Result<String> {
        let word = self.script.pop_front().ok_or(Error::EmptyCorpus)?;
        self.script.push_back(word.clone());
        Ok(word)
    }
}
