//! Keyword tables
//!
//! An ordered list of `(keyword, response)` pairs plus one fallback response.
//! Lookup is a first-match-wins substring scan in declaration order, so the
//! table is a `Vec` and never a hash map.

use thiserror::Error;

/// Reserved key holding the fallback response; never matched by the scan
pub const DEFAULT_KEY: &str = "default";

/// Errors raised while building a keyword table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeywordTableError {
    /// Keyword was empty or whitespace
    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    /// Keyword contained uppercase characters
    #[error("Keyword must be lowercase: {0}")]
    NotLowercase(String),

    /// Keyword declared twice in the same table
    #[error("Duplicate keyword: {0}")]
    DuplicateKeyword(String),

    /// The reserved `default` key was used as a scannable keyword
    #[error("'{DEFAULT_KEY}' is reserved for the fallback response")]
    ReservedKeyword,

    /// No fallback response was supplied
    #[error("Keyword table has no default response")]
    MissingDefault,
}

/// A single keyword and the canned response it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Lowercase substring searched for in the input
    pub keyword: String,
    /// Response returned when the keyword matches
    pub response: String,
}

/// Immutable keyword → response lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
    default_response: String,
}

impl KeywordTable {
    /// Start building a table
    pub fn builder() -> KeywordTableBuilder {
        KeywordTableBuilder::default()
    }

    /// Return the response of the first keyword contained in `input`,
    /// or the default response when nothing matches.
    ///
    /// Matching is case-insensitive. Total over all inputs.
    pub fn lookup(&self, input: &str) -> &str {
        let lowered = input.to_lowercase();
        self.find(&lowered).unwrap_or(&self.default_response)
    }

    /// Scan an already-lowercased input; `None` when no keyword matches
    pub fn find(&self, lowered: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| lowered.contains(entry.keyword.as_str()))
            .map(|entry| entry.response.as_str())
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// Keywords in declaration order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }

    /// Fallback response
    pub fn default_response(&self) -> &str {
        &self.default_response
    }

    /// Number of scannable keywords (the default is not counted)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no scannable keywords
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder validating keywords as they are declared
#[derive(Debug, Default)]
pub struct KeywordTableBuilder {
    entries: Vec<KeywordEntry>,
    default_response: Option<String>,
    error: Option<KeywordTableError>,
}

impl KeywordTableBuilder {
    /// Declare a keyword; declaration order is match priority
    pub fn keyword(mut self, keyword: impl Into<String>, response: impl Into<String>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let keyword = keyword.into();
        if let Err(e) = self.check(&keyword) {
            self.error = Some(e);
            return self;
        }
        self.entries.push(KeywordEntry {
            keyword,
            response: response.into(),
        });
        self
    }

    /// Set the fallback response
    pub fn default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(response.into());
        self
    }

    /// Finish the table, reporting the first validation error encountered
    pub fn build(self) -> Result<KeywordTable, KeywordTableError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let default_response = self
            .default_response
            .ok_or(KeywordTableError::MissingDefault)?;
        Ok(KeywordTable {
            entries: self.entries,
            default_response,
        })
    }

    fn check(&self, keyword: &str) -> Result<(), KeywordTableError> {
        if keyword.trim().is_empty() {
            return Err(KeywordTableError::EmptyKeyword);
        }
        if keyword == DEFAULT_KEY {
            return Err(KeywordTableError::ReservedKeyword);
        }
        if keyword.to_lowercase() != keyword {
            return Err(KeywordTableError::NotLowercase(keyword.to_string()));
        }
        if self.entries.iter().any(|e| e.keyword == keyword) {
            return Err(KeywordTableError::DuplicateKeyword(keyword.to_string()));
        }
        Ok(())
    }
}
