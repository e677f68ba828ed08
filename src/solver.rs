//! The main solver: constraint-propagation backtracking search over a
//! letter-substitution cipher.
//!
//! Given a ciphertext phrase and a word list, the solver enumerates every
//! injective ciphertext→plaintext letter mapping that turns every ciphertext
//! word into a dictionary word simultaneously. Search proceeds depth-first
//! over an explicit work stack: each node carries its own working words,
//! per-word candidate sets, and partial [`Mapping`], so sibling branches
//! never observe each other's tentative assignments.
//!
//! # Error Handling
//!
//! The solver uses [`SolverError`] with one variant:
//!
//! - S001: `InvalidInput` (Phrase or seed validation failed (wraps [`InputError`]))
//!
//! The error has a `code()`, optional `help()`, and `display_detailed()` method.
//! "No solution found" is not an error — the returned iterator is simply empty.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use quipsolve::solver;
//!
//! let words = vec!["dad", "cat"];
//! let solutions: Vec<String> = solver::solve("xyx", &words, None)?.collect();
//!
//! assert_eq!(solutions, vec!["DAD"]);
//! # Ok::<(), quipsolve::solver::SolverError>(())
//! ```
//!
//! ## Seeding a Partial Solution
//!
//! ```
//! use quipsolve::mapping::Mapping;
//! use quipsolve::solver;
//!
//! let seed: Mapping = "x=D".parse()?;
//! let solutions: Vec<String> =
//!     solver::solve("xyx", &["dad", "mom", "pop"], Some(&seed))?.collect();
//!
//! // Every yielded solution is a consistent extension of the seed.
//! assert_eq!(solutions, vec!["DAD"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lazy Consumption
//!
//! ```
//! use quipsolve::solver;
//!
//! // The search only runs as far as the consumer pulls; dropping the
//! // iterator abandons all unexplored branches.
//! let mut solutions = solver::solve("ab ba", &["no", "on"], None)?;
//! assert!(solutions.next().is_some());
//! drop(solutions);
//! # Ok::<(), quipsolve::solver::SolverError>(())
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::cipher_char::CipherChar;
use crate::errors::InputError;
use crate::mapping::Mapping;
use crate::pattern::signature;
use crate::word_list::DictIndex;

/// Unified error type for the solve entry point.
///
/// Callers only need to handle a single `Result<_, SolverError>`; input
/// validation failures from the phrase or seed are wrapped here.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The phrase or seed failed validation before the search began.
    ///
    /// These originate from [`InputError`], which we box to keep the error
    /// type size stable.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] Box<InputError>),
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidInput(_) => "S001",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::InvalidInput(_) => None, // InputError has its own help
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            SolverError::InvalidInput(ie) => {
                // delegate to InputError's detailed display
                format!("{}\n  caused by: {}", self.code(), ie.display_detailed())
            }
        }
    }
}

/// Occurrence counts of every character of the full ciphertext phrase.
///
/// Used only as a search-ordering heuristic: among equally constrained
/// words, prefer the one whose letters appear most often elsewhere in the
/// phrase, since solving it propagates the most constraints. Counts cover
/// every character including the space separator; separators never occur
/// inside a word, so they contribute nothing to any word's weight.
#[derive(Debug, Clone, Default)]
struct LetterWeights {
    counts: HashMap<char, u32>,
}

impl LetterWeights {
    fn from_phrase(phrase: &str) -> Self {
        let mut counts = HashMap::new();
        for c in phrase.chars() {
            *counts.entry(c).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Sum of phrase-wide counts over the characters of `word`. Characters
    /// absent from the phrase (e.g. already-assigned uppercase letters)
    /// weigh zero.
    fn word_weight(&self, word: &str) -> u32 {
        word.chars()
            .map(|c| self.counts.get(&c).copied().unwrap_or(0))
            .sum()
    }
}

/// A word is solved once every character is an assigned plaintext letter.
fn is_solved(word: &str) -> bool {
    word.chars().all(|c| c.is_plain())
}

/// Position-by-position candidate check under the current mapping:
/// solved positions must equal their assigned letter, and unsolved positions
/// must hold a letter not already used as a plaintext assignment.
fn fits_assignments(working: &str, cand: &str, mapping: &Mapping) -> bool {
    debug_assert_eq!(
        working.len(),
        cand.len(),
        "candidates are drawn from the matching length bucket"
    );
    working.chars().zip(cand.chars()).all(|(w, c)| {
        if w.is_plain() {
            w.to_ascii_lowercase() == c
        } else {
            !mapping.uses_plain(c.to_ascii_uppercase())
        }
    })
}

/// One node of the depth-first search. Each node owns private copies of all
/// mutable search state; expansion never touches a sibling's data.
#[derive(Debug, Clone)]
struct SearchNode {
    /// Working words: uppercase = solved position, lowercase = ciphertext.
    words: Vec<String>,
    /// Per-word candidate sets, already structurally filtered.
    possibles: Vec<Vec<Rc<str>>>,
    /// The injective partial solution accumulated on this branch.
    mapping: Mapping,
}

/// Lazy sequence of solved phrases.
///
/// Driving this iterator drives the search: each `next()` call explores
/// branches until one yields a fully solved phrase or the search space is
/// exhausted. The sequence is finite and non-restartable; stop pulling and
/// the remaining branches are simply never expanded.
#[derive(Debug)]
pub struct Solutions {
    stack: Vec<SearchNode>,
    index: DictIndex,
    weights: LetterWeights,
}

impl Iterator for Solutions {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(node) = self.stack.pop() {
            if let Some(solved) = self.expand(node) {
                return Some(solved);
            }
        }
        None
    }
}

impl Solutions {
    /// Process one search node: either yield a complete solution, abandon a
    /// dead branch, or push child nodes for each viable candidate of the
    /// most-constrained unsolved word.
    fn expand(&mut self, node: SearchNode) -> Option<String> {
        let SearchNode {
            words,
            possibles,
            mapping,
        } = node;

        debug_assert_eq!(words.len(), possibles.len());

        // Every solved word must be a real dictionary word. This runs ahead
        // of the terminal check so words solved as a side effect of the last
        // substitution are still validated before anything is yielded.
        for word in words.iter().filter(|w| is_solved(w)) {
            if !self.index.contains(&word.to_ascii_lowercase()) {
                return None;
            }
        }

        // Terminal: all words solved — this branch has no children.
        if words.iter().all(|w| is_solved(w)) {
            return Some(words.join(" "));
        }

        // An unsolved word with no structural candidates left can never be
        // completed.
        if words
            .iter()
            .zip(&possibles)
            .any(|(w, poss)| !is_solved(w) && poss.is_empty())
        {
            return None;
        }

        // Re-filter every unsolved word's candidates against the current
        // assignments; solved words keep an empty set.
        let mut filtered: Vec<Vec<Rc<str>>> = Vec::with_capacity(words.len());
        for (word, poss) in words.iter().zip(&possibles) {
            if is_solved(word) {
                filtered.push(Vec::new());
                continue;
            }
            let keep: Vec<Rc<str>> = poss
                .iter()
                .filter(|cand| fits_assignments(word, cand, &mapping))
                .cloned()
                .collect();
            if keep.is_empty() {
                return None;
            }
            filtered.push(keep);
        }

        // The best word to solve for: fewest remaining candidates, and among
        // ties the word whose letters are most frequent across the phrase.
        let target = words
            .iter()
            .enumerate()
            .filter(|(_, w)| !is_solved(w))
            .min_by_key(|(i, w)| (filtered[*i].len(), Reverse(self.weights.word_weight(w))))
            .map(|(i, _)| i)?;

        let solve_word = &words[target];

        // Children are pushed in reverse so candidates are explored in
        // deterministic (bucket) order.
        for cand in filtered[target].iter().rev() {
            // New assignments arising from the still-unsolved positions.
            let mut add: Vec<(char, char)> = Vec::new();
            for (c, p) in solve_word.chars().zip(cand.chars()) {
                if c.is_cipher() {
                    let plain = p.to_ascii_uppercase();
                    match add.iter_mut().find(|(k, _)| *k == c) {
                        Some(entry) => entry.1 = plain,
                        None => add.push((c, plain)),
                    }
                }
            }

            // No improvement, or an image already taken: not a legal branch.
            if add.is_empty() {
                continue;
            }
            if add.iter().any(|&(_, plain)| mapping.uses_plain(plain)) {
                continue;
            }

            let mut trial = mapping.clone();
            if !add.iter().all(|&(c, plain)| trial.assign(c, plain)) {
                continue;
            }

            // The trial mapping must reproduce the candidate exactly;
            // anything else means two equal ciphertext letters would need
            // two different images.
            if !trial.apply(solve_word).eq_ignore_ascii_case(cand) {
                continue;
            }

            let trial_words: Vec<String> = words.iter().map(|w| trial.apply(w)).collect();
            let trial_possibles: Vec<Vec<Rc<str>>> = trial_words
                .iter()
                .zip(&filtered)
                .map(|(w, poss)| {
                    let sig = signature(w);
                    poss.iter()
                        .filter(|cand| signature(cand) == sig)
                        .cloned()
                        .collect()
                })
                .collect();

            self.stack.push(SearchNode {
                words: trial_words,
                possibles: trial_possibles,
                mapping: trial,
            });
        }

        None
    }
}

/// Validate the normalized phrase: non-empty, only 'a'-'z' and single-space
/// separators, no empty words.
fn validate_phrase(normalized: &str) -> Result<(), Box<InputError>> {
    if normalized.is_empty() {
        return Err(Box::new(InputError::EmptyPhrase));
    }
    if let Some(invalid_char) = normalized.chars().find(|c| !c.is_cipher() && *c != ' ') {
        return Err(Box::new(InputError::InvalidPhraseChar { invalid_char }));
    }
    if normalized.split(' ').any(str::is_empty) {
        return Err(Box::new(InputError::EmptyWord));
    }
    Ok(())
}

/// Solve a cryptogram phrase against a word list, optionally starting from a
/// seed partial solution.
///
/// The phrase is case-insensitive; words are separated by single spaces.
/// Returns a lazy [`Solutions`] iterator over fully solved phrases (uppercase
/// words joined by single spaces). Every yielded solution is a consistent
/// extension of the seed. The sequence is exhausted once all branches are
/// explored; call `solve` again for a fresh, independent search.
///
/// # Errors
///
/// Returns [`SolverError::InvalidInput`] if the phrase contains characters
/// outside the letter+space alphabet or has empty words. (Seed validation
/// happens when the [`Mapping`] is constructed.)
pub fn solve(
    phrase: &str,
    word_list: &[&str],
    seed: Option<&Mapping>,
) -> Result<Solutions, SolverError> {
    let normalized = phrase.to_lowercase();
    validate_phrase(&normalized)?;

    let empty_seed = Mapping::default();
    let seed = seed.unwrap_or(&empty_seed);

    // Working words start as the seed's rendering of the ciphertext.
    let words: Vec<String> = normalized.split(' ').map(|w| seed.apply(w)).collect();

    // Counts over the whole phrase, spaces included; ordering heuristic only.
    let weights = LetterWeights::from_phrase(&normalized);

    let index = DictIndex::build(word_list);

    // Coarse structural filter, applied once per word.
    let possibles: Vec<Vec<Rc<str>>> = words.iter().map(|w| index.pattern_match(w)).collect();

    debug!(
        "solving {} word(s) against {} dictionary entries; initial candidates: {:?}; seed {}",
        words.len(),
        index.len(),
        possibles.iter().map(Vec::len).collect::<Vec<_>>(),
        seed,
    );

    let root = SearchNode {
        words,
        possibles,
        mapping: seed.clone(),
    };

    Ok(Solutions {
        stack: vec![root],
        index,
        weights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn solve_all(phrase: &str, words: &[&str], seed: Option<&Mapping>) -> HashSet<String> {
        solve(phrase, words, seed).unwrap().collect()
    }

    /// Align a solved phrase with its ciphertext and check that the implied
    /// letter mapping is a proper injective function.
    fn assert_injective(phrase: &str, solution: &str) {
        let mut forward: HashMap<char, char> = HashMap::new();
        let mut images: HashMap<char, char> = HashMap::new();
        for (c, p) in phrase.chars().zip(solution.chars()) {
            if c == ' ' {
                assert_eq!(p, ' ');
                continue;
            }
            if let Some(&prev) = forward.get(&c) {
                assert_eq!(prev, p, "cipher '{c}' mapped inconsistently");
            } else {
                forward.insert(c, p);
            }
            if let Some(&prev) = images.get(&p) {
                assert_eq!(prev, c, "plain '{p}' is the image of two cipher letters");
            } else {
                images.insert(p, c);
            }
        }
    }

    #[test]
    fn test_structural_solution() {
        let solutions = solve_all("xyx", &["dad", "cat"], None);
        assert_eq!(solutions, HashSet::from(["DAD".to_string()]));
    }

    #[test]
    fn test_structural_mismatch_never_proposed() {
        // "cat" shares a length but not a signature with "xyx".
        let solutions = solve_all("xyx", &["cat"], None);
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_no_candidates_is_empty_not_error() {
        let solutions = solve_all("abc", &["dad"], None);
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_empty_dictionary_looks_like_no_solution() {
        let solutions = solve_all("ab", &[], None);
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_one_letter_words_always_available() {
        // The fixed one-letter words are added to the index whatever the
        // supplied list contains, so a single-letter phrase word has the
        // three candidates I, A, O.
        let solutions = solve_all("a a", &["a"], None);
        assert_eq!(
            solutions,
            HashSet::from(["I I".to_string(), "A A".to_string(), "O O".to_string()])
        );
    }

    #[test]
    fn test_distinct_cipher_letters_get_distinct_images() {
        // Two distinct one-letter cipher words must decode to two distinct
        // plaintext letters: all ordered pairs over {i, a, o}, no doubles.
        let solutions = solve_all("p q", &["i", "a"], None);
        assert_eq!(solutions.len(), 6);
        assert!(solutions.contains("I A"));
        assert!(solutions.contains("A I"));
        assert!(!solutions.contains("I I"));
        assert!(!solutions.contains("A A"));
        for sol in &solutions {
            assert_injective("p q", sol);
        }
    }

    #[test]
    fn test_shared_letters_propagate_across_words() {
        let dictionary = ["hello", "jelly", "sorry", "world", "would"];
        let solutions = solve_all("ifmmp xpsme", &dictionary, None);

        assert_eq!(
            solutions,
            HashSet::from(["HELLO WORLD".to_string(), "HELLO WOULD".to_string()])
        );
        for sol in &solutions {
            assert_injective("ifmmp xpsme", sol);
        }
    }

    #[test]
    fn test_seed_restricts_search() {
        let dictionary = ["hello", "jelly", "sorry", "world", "would"];
        let seed: Mapping = "s=R".parse().unwrap();
        let solutions = solve_all("ifmmp xpsme", &dictionary, Some(&seed));

        assert_eq!(solutions, HashSet::from(["HELLO WORLD".to_string()]));
    }

    #[test]
    fn test_solutions_extend_seed_assignments() {
        let seed = Mapping::from_pairs(&[('x', 'D')]).unwrap();
        let solutions = solve_all("xyx", &["dad", "mom", "pop"], Some(&seed));

        assert_eq!(solutions, HashSet::from(["DAD".to_string()]));
        // "mom" and "pop" are structurally fine but contradict the seed.
    }

    #[test]
    fn test_contradictory_seed_yields_nothing() {
        let seed = Mapping::from_pairs(&[('x', 'Q')]).unwrap();
        let solutions = solve_all("xyx", &["dad", "mom", "pop"], Some(&seed));
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_side_effect_solved_words_are_validated() {
        // Solving "ab" as "no" fully solves "ba" as a side effect; "on" is
        // not in this dictionary, so the branch must be abandoned rather
        // than yielded.
        let solutions = solve_all("ab ba", &["no", "xy"], None);
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_mutual_reverse_words() {
        let solutions = solve_all("ab ba", &["no", "on"], None);
        assert_eq!(
            solutions,
            HashSet::from(["NO ON".to_string(), "ON NO".to_string()])
        );
        for sol in &solutions {
            assert_injective("ab ba", sol);
        }
    }

    #[test]
    fn test_repeated_cipher_word_decodes_identically() {
        let solutions = solve_all("ab ab", &["no", "on"], None);
        assert_eq!(
            solutions,
            HashSet::from(["NO NO".to_string(), "ON ON".to_string()])
        );
    }

    #[test]
    fn test_candidate_order_does_not_change_solution_set() {
        let forward = solve_all("ab ba", &["no", "on"], None);
        let reversed = solve_all("ab ba", &["on", "no"], None);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_phrase_case_insensitive() {
        let solutions = solve_all("XYX", &["dad"], None);
        assert_eq!(solutions, HashSet::from(["DAD".to_string()]));
    }

    #[test]
    fn test_lazy_consumption_stops_early() {
        let mut solutions = solve("p q", &["i", "a"], None).unwrap();
        assert!(solutions.next().is_some());
        // Dropping the iterator here abandons the remaining branches.
        drop(solutions);
    }

    #[test]
    fn test_fresh_search_per_invocation() {
        let first: Vec<String> = solve("xyx", &["dad"], None).unwrap().collect();
        let second: Vec<String> = solve("xyx", &["dad"], None).unwrap().collect();
        assert_eq!(first, second);
    }

    mod validation {
        use super::*;

        #[test]
        fn test_empty_phrase_rejected() {
            let err = solve("", &["dad"], None).unwrap_err();
            let SolverError::InvalidInput(ie) = err;
            assert!(matches!(*ie, InputError::EmptyPhrase));
        }

        #[test]
        fn test_punctuation_rejected() {
            let err = solve("xyx!", &["dad"], None).unwrap_err();
            let SolverError::InvalidInput(ie) = err;
            assert!(matches!(
                *ie,
                InputError::InvalidPhraseChar { invalid_char: '!' }
            ));
        }

        #[test]
        fn test_digit_rejected() {
            let err = solve("xy3", &["dad"], None).unwrap_err();
            let SolverError::InvalidInput(ie) = err;
            assert!(matches!(
                *ie,
                InputError::InvalidPhraseChar { invalid_char: '3' }
            ));
        }

        #[test]
        fn test_doubled_space_rejected() {
            let err = solve("ab  ba", &["no"], None).unwrap_err();
            let SolverError::InvalidInput(ie) = err;
            assert!(matches!(*ie, InputError::EmptyWord));
        }

        #[test]
        fn test_leading_space_rejected() {
            let err = solve(" ab", &["no"], None).unwrap_err();
            let SolverError::InvalidInput(ie) = err;
            assert!(matches!(*ie, InputError::EmptyWord));
        }

        #[test]
        fn test_solver_error_code_and_display() {
            let err = solve("", &[], None).unwrap_err();
            assert_eq!(err.code(), "S001");
            let detailed = err.display_detailed();
            assert!(detailed.contains("S001"));
            assert!(detailed.contains("E001"));
            assert!(detailed.contains("caused by"));
        }
    }

    mod heuristics {
        use super::*;

        #[test]
        fn test_letter_weights_count_every_character() {
            let weights = LetterWeights::from_phrase("ab ba");
            assert_eq!(weights.word_weight("a"), 2);
            assert_eq!(weights.word_weight("ab"), 4);
            // Spaces are counted but never occur inside a word.
            assert_eq!(weights.word_weight(" "), 1);
            // Uppercase (solved) letters weigh nothing.
            assert_eq!(weights.word_weight("AB"), 0);
        }

        #[test]
        fn test_is_solved() {
            assert!(is_solved("DAD"));
            assert!(!is_solved("DaD"));
            assert!(!is_solved("dad"));
        }

        #[test]
        fn test_fits_assignments_solved_positions() {
            let mapping = Mapping::from_pairs(&[('x', 'D')]).unwrap();
            // Working word "Dy": solved 'D' must line up with 'd'.
            assert!(fits_assignments("Dy", "da", &mapping));
            assert!(!fits_assignments("Dy", "ma", &mapping));
        }

        #[test]
        fn test_fits_assignments_excludes_used_images() {
            let mapping = Mapping::from_pairs(&[('x', 'D')]).unwrap();
            // 'd' is taken, so an unsolved position may not propose it.
            assert!(!fits_assignments("yz", "da", &mapping));
            assert!(fits_assignments("yz", "ma", &mapping));
        }
    }
}
