use std::collections::HashSet;

use crate::engine::Suggester;
use crate::models::Mode;

/// Per-round game state, mutated only by discrete key events. The buffer holds
/// ascii lowercase letters and nothing else; command keys never reach it.
pub struct Round {
    pub mode: Mode,
    pub buffer: String,
    pub required_prefix: Option<String>,
    pub used: HashSet<String>,
    pub words_found: usize,
    pub longest_word: usize,
    pub high_score: usize,
}

impl Round {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            buffer: String::new(),
            required_prefix: None,
            used: HashSet::new(),
            words_found: 0,
            longest_word: 0,
            high_score: 0,
        }
    }

    pub fn on_char(&mut self, c: char) {
        if c.is_ascii_alphabetic() {
            self.buffer.push(c.to_ascii_lowercase());
        }
    }

    pub fn on_backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn on_submit(&mut self, suggester: &mut Suggester) {
        match self.mode {
            Mode::Chain => self.submit_chain(suggester),
            Mode::Bomb => self.submit_bomb(suggester),
        }
    }

    /// Any non-empty alphabetic buffer counts as a submitted word; the game
    /// itself is the judge of validity, the overlay just keeps its books. The
    /// next required prefix is the word's last two letters (one for a
    /// single-letter word) and is pre-seeded into the buffer.
    fn submit_chain(&mut self, suggester: &mut Suggester) {
        let word = std::mem::take(&mut self.buffer);
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_lowercase()) {
            return;
        }

        self.used.insert(word.clone());
        suggester.remove_word(&word);
        self.words_found += 1;
        self.longest_word = self.longest_word.max(word.len());

        let tail = if word.len() >= 2 {
            word[word.len() - 2..].to_string()
        } else {
            word
        };
        self.buffer = tail.clone();
        self.required_prefix = Some(tail);
    }

    /// Scores only when the buffer is actually in the pool; the buffer is
    /// cleared either way.
    fn submit_bomb(&mut self, suggester: &mut Suggester) {
        let word = std::mem::take(&mut self.buffer);
        if suggester.contains(&word) {
            self.high_score = self.high_score.max(word.len());
            suggester.remove_word(&word);
        }
    }

    /// Chain-mode round reset: pool back to the full dictionary, all
    /// bookkeeping cleared.
    pub fn new_round(&mut self, suggester: &mut Suggester) {
        suggester.reset_round();
        self.used.clear();
        self.words_found = 0;
        self.longest_word = 0;
        self.high_score = 0;
        self.required_prefix = None;
        self.buffer.clear();
    }
}
