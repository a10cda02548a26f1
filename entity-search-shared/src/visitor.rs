//! Query-building dispatch contract.
//!
//! The configuration model does not know how queries are built. A search
//! backend implements [`FieldQueryVisitor`] once per query language and
//! [`QueryDocument`] for its in-progress query, and callers holding a list of
//! heterogeneous fields dispatch through [`FieldConfig::accept`] without
//! branching on kind.
//!
//! [`FieldConfig::accept`]: crate::FieldConfig::accept

use crate::fields::{BooleanField, DateField, KeywordField, LocationField, NumberField, TextField};

/// How a clause takes part in the enclosing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// Must match and contributes to the score.
    Must,
    /// May match; matching raises the score.
    Should,
    /// Must match and does not contribute to the score.
    Filter,
    /// Must not match.
    MustNot,
}

impl Occur {
    pub const ALL: [Occur; 4] = [Occur::Must, Occur::Should, Occur::Filter, Occur::MustNot];
}

/// An in-progress query that accumulates clauses.
pub trait QueryDocument {
    /// One clause in the backend's query representation.
    type Clause;

    /// Add a clause under the given occurrence.
    fn add_clause(&mut self, occur: Occur, clause: Self::Clause);

    /// Number of clauses added so far, across all occurrences.
    fn clause_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.clause_count() == 0
    }
}

/// One operation per field kind.
///
/// Each operation incorporates the given field's contribution into
/// `document`. Operations return nothing; what a field contributes, and
/// whether it contributes at all, is up to the implementation.
pub trait FieldQueryVisitor {
    type Document: QueryDocument + ?Sized;

    fn visit_keyword(&self, field: &KeywordField, document: &mut Self::Document);

    fn visit_text(&self, field: &TextField, document: &mut Self::Document);

    fn visit_number(&self, field: &NumberField, document: &mut Self::Document);

    fn visit_date(&self, field: &DateField, document: &mut Self::Document);

    fn visit_location(&self, field: &LocationField, document: &mut Self::Document);

    fn visit_boolean(&self, field: &BooleanField, document: &mut Self::Document);
}
