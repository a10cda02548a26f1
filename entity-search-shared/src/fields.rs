//! Field configuration types.
//!
//! A field describes one searchable attribute of an entity. Every field has a
//! name, an optional boost and a `required` flag; the remaining attributes
//! depend on the field's kind.

use std::fmt;

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::visitor::FieldQueryVisitor;

/// Default strftime pattern used to parse date values.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Highest edit distance accepted for fuzzy text matching.
pub const MAX_FUZZY_EDITS: u8 = 2;

/// The kind of a field, without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Keyword,
    Text,
    Number,
    Date,
    Location,
    Boolean,
}

impl FieldKind {
    /// Every field kind, in declaration order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Keyword,
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Location,
        FieldKind::Boolean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Keyword => "keyword",
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Location => "location",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed edit distance for fuzzy text matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FuzzinessRepr", into = "FuzzinessRepr")]
pub enum Fuzziness {
    /// Edit distance chosen from the term length.
    #[default]
    Auto,
    /// Fixed edit distance.
    Edits(u8),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FuzzinessRepr {
    Edits(u8),
    Named(String),
}

impl TryFrom<FuzzinessRepr> for Fuzziness {
    type Error = String;

    fn try_from(repr: FuzzinessRepr) -> Result<Self, Self::Error> {
        match repr {
            FuzzinessRepr::Edits(n) => Ok(Fuzziness::Edits(n)),
            FuzzinessRepr::Named(s) if s.eq_ignore_ascii_case("auto") => Ok(Fuzziness::Auto),
            FuzzinessRepr::Named(s) => Err(format!("unknown fuzziness '{}'", s)),
        }
    }
}

impl From<Fuzziness> for FuzzinessRepr {
    fn from(fuzziness: Fuzziness) -> Self {
        match fuzziness {
            Fuzziness::Auto => FuzzinessRepr::Named("AUTO".to_string()),
            Fuzziness::Edits(n) => FuzzinessRepr::Edits(n),
        }
    }
}

/// How the terms of a text value are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    /// Any term may match.
    #[default]
    Or,
    /// Every term must match.
    And,
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOperator::Or => f.write_str("or"),
            MatchOperator::And => f.write_str("and"),
        }
    }
}

/// Exact-value field such as an identifier or a code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
    /// Compare values ignoring ASCII case.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl KeywordField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
            case_insensitive: false,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }
}

/// Free-text field matched on analyzed terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub fuzziness: Fuzziness,
    #[serde(default)]
    pub operator: MatchOperator,
}

impl TextField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
            fuzziness: Fuzziness::Auto,
            operator: MatchOperator::Or,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    pub fn with_operator(mut self, operator: MatchOperator) -> Self {
        self.operator = operator;
        self
    }
}

/// Numeric field matched within an absolute tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
    /// Values within `value ± tolerance` match.
    #[serde(default)]
    pub tolerance: f64,
}

impl NumberField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
            tolerance: 0.0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Calendar date field matched within a window of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
    /// strftime pattern used to parse record values.
    #[serde(default = "default_date_format")]
    pub format: String,
    #[serde(default)]
    pub window_days: u32,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// A date format must be well formed and name a full calendar date: a year
/// with either a month and day, or an ordinal day.
fn is_complete_date_format(format: &str) -> bool {
    let (mut year, mut month, mut day, mut ordinal) = (false, false, false, false);

    for item in StrftimeItems::new(format) {
        match item {
            Item::Error => return false,
            Item::Numeric(Numeric::Year | Numeric::YearMod100, _) => year = true,
            Item::Numeric(Numeric::Month, _)
            | Item::Fixed(Fixed::ShortMonthName | Fixed::LongMonthName) => month = true,
            Item::Numeric(Numeric::Day, _) => day = true,
            Item::Numeric(Numeric::Ordinal, _) => ordinal = true,
            _ => {}
        }
    }

    year && ((month && day) || ordinal)
}

impl DateField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
            format: default_date_format(),
            window_days: 0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }
}

/// Geographic point field matched within a radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
    pub distance_km: f64,
}

impl LocationField {
    pub fn new(name: impl Into<String>, distance_km: f64) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
            distance_km,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// True/false flag field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub required: bool,
}

impl BooleanField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
            required: false,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A field of any kind.
///
/// The set of variants is closed. Code that needs per-kind behaviour either
/// matches on this enum exhaustively or implements [`FieldQueryVisitor`] and
/// calls [`FieldConfig::accept`], so a new kind cannot be added without
/// touching every dispatch site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldConfig {
    Keyword(KeywordField),
    Text(TextField),
    Number(NumberField),
    Date(DateField),
    Location(LocationField),
    Boolean(BooleanField),
}

impl FieldConfig {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldConfig::Keyword(_) => FieldKind::Keyword,
            FieldConfig::Text(_) => FieldKind::Text,
            FieldConfig::Number(_) => FieldKind::Number,
            FieldConfig::Date(_) => FieldKind::Date,
            FieldConfig::Location(_) => FieldKind::Location,
            FieldConfig::Boolean(_) => FieldKind::Boolean,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldConfig::Keyword(f) => &f.name,
            FieldConfig::Text(f) => &f.name,
            FieldConfig::Number(f) => &f.name,
            FieldConfig::Date(f) => &f.name,
            FieldConfig::Location(f) => &f.name,
            FieldConfig::Boolean(f) => &f.name,
        }
    }

    pub fn boost(&self) -> Option<f32> {
        match self {
            FieldConfig::Keyword(f) => f.boost,
            FieldConfig::Text(f) => f.boost,
            FieldConfig::Number(f) => f.boost,
            FieldConfig::Date(f) => f.boost,
            FieldConfig::Location(f) => f.boost,
            FieldConfig::Boolean(f) => f.boost,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            FieldConfig::Keyword(f) => f.required,
            FieldConfig::Text(f) => f.required,
            FieldConfig::Number(f) => f.required,
            FieldConfig::Date(f) => f.required,
            FieldConfig::Location(f) => f.required,
            FieldConfig::Boolean(f) => f.required,
        }
    }

    /// Dispatch this field to the visitor operation for its kind.
    ///
    /// Exactly one operation of `visitor` is called, once.
    pub fn accept<V>(&self, visitor: &V, document: &mut V::Document)
    where
        V: FieldQueryVisitor + ?Sized,
    {
        match self {
            FieldConfig::Keyword(f) => visitor.visit_keyword(f, document),
            FieldConfig::Text(f) => visitor.visit_text(f, document),
            FieldConfig::Number(f) => visitor.visit_number(f, document),
            FieldConfig::Date(f) => visitor.visit_date(f, document),
            FieldConfig::Location(f) => visitor.visit_location(f, document),
            FieldConfig::Boolean(f) => visitor.visit_boolean(f, document),
        }
    }

    /// Check the field's attributes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name();
        if name.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "{} field has an empty name",
                self.kind()
            )));
        }

        if let Some(boost) = self.boost() {
            if !boost.is_finite() || boost <= 0.0 {
                return Err(ConfigError::invalid_field(
                    name,
                    format!("boost must be a positive number, got {}", boost),
                ));
            }
        }

        match self {
            FieldConfig::Text(f) => {
                if let Fuzziness::Edits(n) = f.fuzziness {
                    if n > MAX_FUZZY_EDITS {
                        return Err(ConfigError::invalid_field(
                            name,
                            format!("fuzziness must be at most {}, got {}", MAX_FUZZY_EDITS, n),
                        ));
                    }
                }
            }
            FieldConfig::Number(f) => {
                if !f.tolerance.is_finite() || f.tolerance < 0.0 {
                    return Err(ConfigError::invalid_field(
                        name,
                        format!("tolerance must be a non-negative number, got {}", f.tolerance),
                    ));
                }
            }
            FieldConfig::Date(f) => {
                if !is_complete_date_format(&f.format) {
                    return Err(ConfigError::invalid_field(
                        name,
                        format!("invalid date format '{}'", f.format),
                    ));
                }
            }
            FieldConfig::Location(f) => {
                if !f.distance_km.is_finite() || f.distance_km <= 0.0 {
                    return Err(ConfigError::invalid_field(
                        name,
                        format!("distance_km must be a positive number, got {}", f.distance_km),
                    ));
                }
            }
            FieldConfig::Keyword(_) | FieldConfig::Boolean(_) => {}
        }

        Ok(())
    }
}

impl From<KeywordField> for FieldConfig {
    fn from(field: KeywordField) -> Self {
        FieldConfig::Keyword(field)
    }
}

impl From<TextField> for FieldConfig {
    fn from(field: TextField) -> Self {
        FieldConfig::Text(field)
    }
}

impl From<NumberField> for FieldConfig {
    fn from(field: NumberField) -> Self {
        FieldConfig::Number(field)
    }
}

impl From<DateField> for FieldConfig {
    fn from(field: DateField) -> Self {
        FieldConfig::Date(field)
    }
}

impl From<LocationField> for FieldConfig {
    fn from(field: LocationField) -> Self {
        FieldConfig::Location(field)
    }
}

impl From<BooleanField> for FieldConfig {
    fn from(field: BooleanField) -> Self {
        FieldConfig::Boolean(field)
    }
}
