//! # Entity Search Shared
//!
//! The canonical entity configuration model and the contract that query
//! builders implement against it.
//!
//! This crate has no search-engine dependency. Backends implement
//! [`FieldQueryVisitor`] and [`QueryDocument`] and receive each field through
//! [`FieldConfig::accept`].

pub mod entity;
pub mod errors;
pub mod fields;
pub mod record;
pub mod visitor;

pub use entity::EntityConfig;
pub use errors::ConfigError;
pub use fields::{
    BooleanField, DateField, FieldConfig, FieldKind, Fuzziness, KeywordField, LocationField,
    MatchOperator, NumberField, TextField, DEFAULT_DATE_FORMAT,
};
pub use record::{EntityRecord, FieldValue};
pub use visitor::{FieldQueryVisitor, Occur, QueryDocument};
