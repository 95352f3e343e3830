use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Asset;

/// Loads the dictionary: the given file, or the embedded english list.
/// Entries are normalized to lowercase and anything non-alphabetic is dropped.
pub fn load_words(path: Option<&Path>) -> Result<Vec<String>> {
    let raw = match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("could not read wordlist {}", p.display()))?,
        None => {
            let file = Asset::get("words/english.txt")
                .context("embedded wordlist words/english.txt is missing")?;
            String::from_utf8(file.data.into_owned())
                .context("embedded wordlist is not valid utf-8")?
        }
    };

    let mut words: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|w| w.to_ascii_lowercase())
        .collect();
    words.sort();
    words.dedup();

    ensure!(!words.is_empty(), "wordlist contains no usable words");
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_list_loads_and_is_normalized() {
        let words = load_words(None).unwrap();
        assert!(!words.is_empty());
        assert!(words
            .iter()
            .all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
        let mut sorted = words.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(words, sorted);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_words(Some(Path::new("/nonexistent/words.txt"))).is_err());
    }
}
