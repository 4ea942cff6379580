//! The filter mini-language.
//!
//! A [`Filter`] is a conjunction of clauses evaluated against a document's
//! named fields: exact match, regex match, set membership, and recursive
//! any-of/all-of combinators. Clauses are a closed enum, so an unrecognized
//! operator is unrepresentable rather than silently matching everything.

use regex::Regex;

use super::Document;

#[derive(Debug, Clone)]
enum Clause {
    /// Field equals the literal exactly.
    Eq(String, String),
    /// Field matches the compiled pattern (unanchored unless the pattern
    /// anchors itself).
    Regex(String, Regex),
    /// Field value is a member of the set.
    In(String, Vec<String>),
    /// At least one sub-filter matches.
    AnyOf(Vec<Filter>),
    /// Every sub-filter matches.
    AllOf(Vec<Filter>),
}

/// A declarative match predicate over documents in one collection.
///
/// An empty filter matches everything. All clauses must hold for a document
/// to match (implicit AND across clauses).
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// A filter that matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value` exactly.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq(field.into(), value.into()));
        self
    }

    /// Require `field` to match `pattern`. Fails on an invalid pattern —
    /// callers surface that as a validation error, not a storage error.
    pub fn regex(mut self, field: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.clauses.push(Clause::Regex(field.into(), regex));
        Ok(self)
    }

    /// Require `field`'s value to be one of `values`.
    pub fn is_in(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.clauses.push(Clause::In(field.into(), values));
        self
    }

    /// Require at least one of `filters` to match (logical OR).
    pub fn any_of(mut self, filters: Vec<Filter>) -> Self {
        self.clauses.push(Clause::AnyOf(filters));
        self
    }

    /// Require every one of `filters` to match (logical AND).
    pub fn all_of(mut self, filters: Vec<Filter>) -> Self {
        self.clauses.push(Clause::AllOf(filters));
        self
    }

    /// Evaluate the filter against one document. A clause naming a field the
    /// document does not carry (or carries as `None`) does not match.
    pub fn matches<T: Document>(&self, doc: &T) -> bool {
        self.clauses.iter().all(|clause| clause.matches(doc))
    }
}

impl Clause {
    fn matches<T: Document>(&self, doc: &T) -> bool {
        match self {
            Clause::Eq(field, value) => doc.field(field).is_some_and(|v| v == *value),
            Clause::Regex(field, regex) => doc.field(field).is_some_and(|v| regex.is_match(&v)),
            Clause::In(field, values) => doc
                .field(field)
                .is_some_and(|v| values.iter().any(|candidate| *candidate == v)),
            Clause::AnyOf(filters) => filters.iter().any(|f| f.matches(doc)),
            Clause::AllOf(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}
