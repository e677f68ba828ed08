//! Error types for input validation and dictionary loading, with error codes
//! and helpful messages.
//!
//! # Error Codes
//!
//! Each `InputError` variant has a unique code (E001-E008) for documentation
//! lookup:
//!
//! - E001: `EmptyPhrase` (Phrase is empty)
//! - E002: `InvalidPhraseChar` (Character outside the letter+space alphabet)
//! - E003: `EmptyWord` (Empty word produced by doubled/leading/trailing space)
//! - E004: `InvalidSeedCipher` (Seed key is not a lowercase letter)
//! - E005: `InvalidSeedPlain` (Seed value is not an uppercase letter)
//! - E006: `SeedNotInjective` (Two seed keys map to the same plaintext letter)
//! - E007: `InvalidSeedEntry` (Malformed entry in a seed spec string)
//! - E008: `ConflictingSeedAssignment` (Same seed key bound to two letters)
//!
//! Dictionary loading failures use a separate type so callers can tell
//! "the word list could not be read" (D001) apart from "the word list was
//! read and the search found nothing":
//!
//! - D001: `Unavailable` (Word-list file could not be read)
//!
//! # Examples
//!
//! ```
//! use quipsolve::errors::InputError;
//!
//! fn check_letter(c: char) -> Result<(), Box<InputError>> {
//!     if !c.is_ascii_lowercase() && c != ' ' {
//!         return Err(Box::new(InputError::InvalidPhraseChar { invalid_char: c }));
//!     }
//!     Ok(())
//! }
//!
//! match check_letter('7') {
//!     Err(e) => {
//!         println!("Error: {}", e);
//!         println!("Code: {}", e.code());
//!         if let Some(help) = e.help() {
//!             println!("Help: {}", help);
//!         }
//!     }
//!     Ok(_) => println!("Success"),
//! }
//! ```

use std::io;

/// Custom error type for phrase and seed validation.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("empty phrase")]
    EmptyPhrase,

    #[error("invalid character '{invalid_char}' in phrase (only a-z and single spaces allowed)")]
    InvalidPhraseChar { invalid_char: char },

    #[error("empty word in phrase (check for doubled, leading, or trailing spaces)")]
    EmptyWord,

    #[error("invalid seed key '{invalid_char}' (must be a lowercase ciphertext letter a-z)")]
    InvalidSeedCipher { invalid_char: char },

    #[error("invalid seed value '{invalid_char}' (must be an uppercase plaintext letter A-Z)")]
    InvalidSeedPlain { invalid_char: char },

    #[error("seed is not injective: '{first}' and '{second}' both map to '{plain}'")]
    SeedNotInjective {
        plain: char,
        first: char,
        second: char,
    },

    #[error("invalid seed entry \"{entry}\"")]
    InvalidSeedEntry { entry: String },

    #[error("conflicting seed assignments for '{cipher}' ({older} / {newer})")]
    ConflictingSeedAssignment {
        cipher: char,
        older: char,
        newer: char,
    },
}

impl From<InputError> for io::Error {
    fn from(ie: InputError) -> Self {
        // String version is the least fragile (no Send/Sync bounds issues)
        io::Error::new(io::ErrorKind::InvalidInput, ie.to_string())
    }
}

impl InputError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            InputError::EmptyPhrase => "E001",
            InputError::InvalidPhraseChar { .. } => "E002",
            InputError::EmptyWord => "E003",
            InputError::InvalidSeedCipher { .. } => "E004",
            InputError::InvalidSeedPlain { .. } => "E005",
            InputError::SeedNotInjective { .. } => "E006",
            InputError::InvalidSeedEntry { .. } => "E007",
            InputError::ConflictingSeedAssignment { .. } => "E008",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            InputError::EmptyPhrase => Some("Supply at least one ciphertext word, e.g. \"xyx\""),
            InputError::InvalidPhraseChar { .. } => Some("Strip punctuation and digits first; the phrase must be words of a-z separated by single spaces"),
            InputError::EmptyWord => Some("Separate words with exactly one space and trim the ends of the phrase"),
            InputError::InvalidSeedCipher { .. } => Some("Seed keys name ciphertext letters and must be lowercase a-z"),
            InputError::InvalidSeedPlain { .. } => Some("Seed values name plaintext letters and must be uppercase A-Z"),
            InputError::SeedNotInjective { .. } => Some("A substitution cipher never sends two ciphertext letters to the same plaintext letter"),
            InputError::InvalidSeedEntry { .. } => Some("Expected comma-separated cipher=PLAIN pairs, e.g. \"q=H,l=A\""),
            InputError::ConflictingSeedAssignment { .. } => Some("Each ciphertext letter can be seeded with at most one plaintext letter"),
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Failure to obtain the external word list.
///
/// Deliberately distinct from "no solutions": an unreadable word list must
/// never present itself as an empty search result.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("word list unavailable at '{path}': {source}")]
    Unavailable {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DictionaryError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DictionaryError::Unavailable { .. } => "D001",
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        let help = match self {
            DictionaryError::Unavailable { .. } => {
                Some("Check the path, or pass --word-list pointing at a readable one-word-per-line file")
            }
        };
        format_error_with_code_and_help(&self.to_string(), self.code(), help)
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
