use std::collections::{BTreeSet, HashSet};

/// Letters that score a word as "hard". Chain mode surfaces these first among
/// equal-length candidates so rare letters get burned while options still exist.
const UNCOMMON_LETTERS: [char; 5] = ['j', 'q', 'x', 'z', 'v'];

/// Owns the full dictionary plus the shrinking pool for the current round.
/// Pure and synchronous; every query works against the sorted pool so results
/// come back in lexicographic order before ranking.
pub struct Suggester {
    dictionary: HashSet<String>,
    pool: BTreeSet<String>,
}

impl Suggester {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        let dictionary: HashSet<String> = words.into_iter().collect();
        let pool = dictionary.iter().cloned().collect();
        Self { dictionary, pool }
    }

    /// Restores the pool to the full dictionary. Used-word and score state live
    /// in `Round` and are reset separately.
    pub fn reset_round(&mut self) {
        self.pool = self.dictionary.iter().cloned().collect();
    }

    /// Case-insensitive removal from the round pool only. Idempotent: the
    /// return value says whether the word was still present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        self.pool.remove(&word.to_lowercase())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.pool.contains(word)
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Lexicographically-first word left in the pool, the panic plan's last
    /// resort when nothing matches the buffer at all.
    pub fn first_remaining(&self) -> Option<&str> {
        self.pool.iter().next().map(String::as_str)
    }

    fn difficulty_score(word: &str) -> usize {
        word.chars().filter(|c| UNCOMMON_LETTERS.contains(c)).count()
    }

    /// Last-letter suggestions. The effective search prefix is the typed
    /// buffer, prepended with the required prefix when the buffer ignores it.
    /// Falls back to the required prefix alone when the buffer matches nothing,
    /// so a valid option is shown whenever one still exists.
    pub fn suggest_chain(
        &self,
        required_prefix: Option<&str>,
        letters: &str,
        limit: usize,
        used: &HashSet<String>,
    ) -> (Vec<String>, bool) {
        let required = required_prefix.unwrap_or("");
        let prefix = if !required.is_empty() && !letters.starts_with(required) {
            format!("{required}{letters}")
        } else {
            letters.to_string()
        };

        let mut matches: Vec<&String> = self
            .pool
            .iter()
            .filter(|w| w.starts_with(&prefix) && !used.contains(*w))
            .collect();
        let mut strict = true;

        if matches.is_empty() && !required.is_empty() {
            strict = false;
            matches = self
                .pool
                .iter()
                .filter(|w| w.starts_with(required) && !used.contains(*w))
                .collect();
        }

        // stable sort over a lexicographically ordered candidate list, so the
        // final tie-break is alphabetical
        matches.sort_by_key(|w| (w.len(), Self::difficulty_score(w)));
        matches.truncate(limit);
        (matches.into_iter().cloned().collect(), strict)
    }

    /// WordBomb suggestions: prefix match on the buffer, substring fallback.
    /// The longest candidate is forced into the result so the UI always has an
    /// autocomplete target, even when it ranks outside the shown set.
    pub fn suggest_bomb(&self, letters: &str, limit: usize) -> (Vec<String>, bool) {
        if letters.is_empty() {
            return (Vec::new(), true);
        }

        let mut matches: Vec<&String> =
            self.pool.iter().filter(|w| w.starts_with(letters)).collect();
        let mut strict = true;

        if matches.is_empty() {
            strict = false;
            matches = self.pool.iter().filter(|w| w.contains(letters)).collect();
        }

        let longest: Option<String> = matches
            .iter()
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|w| (*w).clone());

        matches.sort_by_key(|w| w.len());
        matches.truncate(limit.saturating_sub(1));
        let mut ranked: Vec<String> = matches.into_iter().cloned().collect();
        if let Some(best) = longest {
            if !ranked.contains(&best) {
                ranked.push(best);
            }
        }
        ranked.truncate(limit);
        (ranked, strict)
    }
}
