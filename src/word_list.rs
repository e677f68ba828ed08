//! `word_list` — loading and indexing the plaintext dictionary.
//!
//! Two layers live here:
//!
//! - [`WordList`]: reads a one-word-per-line word list (from a file or an
//!   in-memory string) into a flat `Vec<String>` of lowercase words. Entries
//!   containing anything but letters are skipped — they can never match a
//!   letters-only ciphertext word. The final list is deduplicated and sorted
//!   by length first, then alphabetically.
//! - [`DictIndex`]: the solver-facing index. Words are bucketed by length
//!   for candidate lookup, with the full word set kept alongside for
//!   membership checks. Built once per solve invocation; read-only after.
//!
//! The index hands out `Rc<str>` entries so candidate sets can be copied
//! across search branches without re-allocating the words themselves (the
//! solver is single-threaded, so `Rc` rather than `Arc`).

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::errors::DictionaryError;
use crate::pattern::signature;

/// One-letter words that are always usable, whatever the supplied list says.
/// Most word lists omit single letters entirely, which would make any
/// one-letter ciphertext word unsolvable.
const ONE_LETTER_WORDS: [&str; 3] = ["i", "a", "o"];

/// Struct representing a processed, ready-to-use word list.
///
/// The `entries` vector contains all valid words (filtered, normalized,
/// deduplicated), already sorted by (length, alphabetical).
#[derive(Debug, Clone)]
pub struct WordList {
    /// List of lowercase words.
    /// Example: `["able", "acid", "acorn", ...]`
    pub entries: Vec<String>,
}

impl WordList {
    /// Parse a raw word list from an in-memory string, one word per line.
    ///
    /// # Behavior:
    /// 1. Splits the input into lines and trims each.
    /// 2. Skips empty lines.
    /// 3. Converts each word to lowercase.
    /// 4. Skips entries containing non-letter characters (apostrophes,
    ///    digits, hyphens) — they cannot match letters-only ciphertext.
    /// 5. Deduplicates the list.
    /// 6. Sorts by length, then alphabetically.
    #[must_use]
    pub fn parse_from_str(contents: &str) -> WordList {
        let mut entries: Vec<String> = contents
            .lines()
            .filter_map(|raw_line| {
                let line = raw_line.trim();

                // Skip empty lines early — no work needed.
                if line.is_empty() {
                    return None;
                }

                let word = line.to_lowercase();

                // Only pure a-z entries can ever appear in a solution.
                if !word.chars().all(|c| c.is_ascii_lowercase()) {
                    return None;
                }

                Some(word)
            })
            .collect();

        // Deduplicate: sort alphabetically first, because `dedup()` only
        // removes *adjacent* duplicates.
        entries.sort();
        entries.dedup();

        // Final order: by length, then alphabetical within a length.
        entries.sort_by(|a, b| match a.len().cmp(&b.len()) {
            std::cmp::Ordering::Equal => a.cmp(b),
            other => other,
        });

        WordList { entries }
    }

    /// Convenience method: read from a file path and parse.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::Unavailable`] if the file cannot be read.
    /// An unreadable word list is a reportable condition of its own, never
    /// an empty list.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<WordList, DictionaryError> {
        let path_ref = path.as_ref();

        let data = std::fs::read_to_string(path_ref).map_err(|e| DictionaryError::Unavailable {
            path: path_ref.display().to_string(),
            source: e,
        })?;

        Ok(Self::parse_from_str(&data))
    }
}

/// Length-bucketed dictionary index for candidate lookup.
#[derive(Debug, Clone, Default)]
pub struct DictIndex {
    /// Mapping from word length -> all words of that length, sorted so
    /// candidate enumeration order is deterministic.
    by_len: HashMap<usize, Vec<Rc<str>>>,
    /// Every word, for membership checks against solved words.
    all: HashSet<Rc<str>>,
}

impl DictIndex {
    /// Build the index from a word collection. `O(total letters)`.
    ///
    /// Words are lowercased and deduplicated; duplicates in the input are
    /// harmless. The one-letter words `i`, `a`, `o` are always added to the
    /// length-1 bucket and the overall word set, whether or not the supplied
    /// collection contains them.
    #[must_use]
    pub fn build(words: &[&str]) -> DictIndex {
        let mut all: HashSet<Rc<str>> = HashSet::with_capacity(words.len() + ONE_LETTER_WORDS.len());

        for word in words {
            if word.is_empty() {
                continue;
            }
            all.insert(Rc::from(word.to_lowercase()));
        }
        for one in ONE_LETTER_WORDS {
            all.insert(Rc::from(one));
        }

        let mut by_len: HashMap<usize, Vec<Rc<str>>> = HashMap::new();
        for word in &all {
            by_len.entry(word.len()).or_default().push(Rc::clone(word));
        }
        for bucket in by_len.values_mut() {
            bucket.sort();
        }

        DictIndex { by_len, all }
    }

    /// All words of the given length, sorted. Empty if no such bucket.
    #[must_use]
    pub fn bucket(&self, len: usize) -> &[Rc<str>] {
        self.by_len.get(&len).map_or(&[], Vec::as_slice)
    }

    /// Whether `word` (lowercase) is in the overall word set.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.all.contains(word)
    }

    /// Number of distinct words in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// The coarse structural filter: all words in the matching length bucket
    /// whose signature equals the signature of `word`.
    ///
    /// An empty result is a valid outcome (no candidates), not a failure.
    #[must_use]
    pub fn pattern_match(&self, word: &str) -> Vec<Rc<str>> {
        let sig = signature(word);
        self.bucket(word.len())
            .iter()
            .filter(|cand| signature(cand) == sig)
            .cloned()
            .collect()
    }
}
