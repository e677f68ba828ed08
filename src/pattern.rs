//! Structural signatures for words.
//!
//! A signature captures which positions of a word hold the same character,
//! independent of which character it is: every position is tagged with the
//! first index at which its character occurs. `"xyx"` and `"dad"` share the
//! signature `[0, 1, 0]`; `"cat"` does not. Two words can render each other
//! under some letter-for-letter substitution iff their signatures are equal,
//! which is what makes this the coarse candidate filter for the solver.
//!
//! Characters are compared as-is: in a working word an unsolved lowercase
//! cipher letter and a solved uppercase plaintext letter are distinct
//! symbols, so `"aA"` has signature `[0, 1]`, not `[0, 0]`.

use std::collections::HashMap;

/// The repeated-letter structure of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u16>);

/// Compute the structural signature of `word`.
///
/// Pure function; `O(len)` with a small per-word scratch map.
#[must_use]
pub fn signature(word: &str) -> Signature {
    let mut first_seen: HashMap<char, u16> = HashMap::new();
    let indices = word
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let i = u16::try_from(i).unwrap_or(u16::MAX);
            *first_seen.entry(c).or_insert(i)
        })
        .collect();
    Signature(indices)
}
