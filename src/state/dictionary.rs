//! Dictionary lookups.
//!
//! The match only ever asks one question of the dictionary: is this word
//! real? [`Lexicon`] is that interface; [`Dictionary`] is the word-list
//! implementation used in play.

use std::collections::HashSet;

use once_cell::sync::OnceCell;

use super::source::TextSource;
use crate::error::LoadError;

/// Shortest word kept from a word list.
pub const MIN_WORD_LENGTH: usize = 3;

/// Case-insensitive set-membership oracle.
pub trait Lexicon: Send + Sync {
    /// Load the word list. Idempotent.
    fn load(&self) -> Result<(), LoadError>;

    /// Exact, case-insensitive membership. `false` for everything until loaded.
    fn is_valid(&self, word: &str) -> bool;

    fn is_loaded(&self) -> bool;

    fn word_count(&self) -> usize;
}

/// Word list loaded once from a [`TextSource`].
///
/// Concurrent `load` calls share a single read; a failed load leaves the
/// dictionary unloaded so the caller may try again.
#[derive(Debug)]
pub struct Dictionary {
    source: TextSource,
    words: OnceCell<HashSet<String>>,
}

impl Dictionary {
    pub fn new(source: TextSource) -> Self {
        Self {
            source,
            words: OnceCell::new(),
        }
    }

    /// Build and load a dictionary from in-memory text.
    pub fn from_text(text: &str) -> Self {
        let dictionary = Self::new(TextSource::inline(text));
        let _ = dictionary.words.set(parse_word_list(text));
        dictionary
    }
}

impl Lexicon for Dictionary {
    fn load(&self) -> Result<(), LoadError> {
        self.words.get_or_try_init(|| {
            let text = self.source.read()?;
            let words = parse_word_list(&text);
            log::info!("Dictionary loaded with {} words", words.len());
            Ok::<_, LoadError>(words)
        })?;
        Ok(())
    }

    fn is_valid(&self, word: &str) -> bool {
        self.words
            .get()
            .is_some_and(|words| words.contains(&word.trim().to_uppercase()))
    }

    fn is_loaded(&self) -> bool {
        self.words.get().is_some()
    }

    fn word_count(&self) -> usize {
        self.words.get().map_or(0, HashSet::len)
    }
}

/// One word per line; trimmed, uppercased, short lines dropped.
fn parse_word_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|word| word.chars().count() >= MIN_WORD_LENGTH)
        .collect()
}
