//! OpenSearch query builders.
//!
//! This module turns entity field configurations into OpenSearch query
//! clauses. [`OpenSearchQueryBuilder`] works from one record: for each
//! configured field it reads the record's value and adds the clause for that
//! field's kind to a [`BoolQueryDocument`].
//!
//! | Kind     | Clause         |
//! |----------|----------------|
//! | keyword  | `term`         |
//! | text     | `match`        |
//! | number   | `range`        |
//! | date     | `range`        |
//! | location | `geo_distance` |
//! | boolean  | `term`         |
//!
//! Required fields go to `filter` (`must` for text, so they still score);
//! optional fields go to `should`.

use chrono::{Days, NaiveDate};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use entity_search_shared::{
    BooleanField, DateField, EntityRecord, FieldKind, FieldQueryVisitor, FieldValue, Fuzziness,
    KeywordField, LocationField, MatchOperator, NumberField, Occur, QueryDocument, TextField,
};

use crate::opensearch::document::BoolQueryDocument;

/// Output format of dates in range clauses, in chrono and OpenSearch notation.
const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";
const RANGE_DATE_FORMAT_DSL: &str = "yyyy-MM-dd";

/// Builds clauses for every field from the values of one record.
pub struct OpenSearchQueryBuilder<'a> {
    record: &'a EntityRecord,
}

impl<'a> OpenSearchQueryBuilder<'a> {
    pub fn new(record: &'a EntityRecord) -> Self {
        Self { record }
    }

    /// Look up a field's value, logging when the record has none.
    fn value_of(&self, field: &str) -> Option<&'a FieldValue> {
        let value = self.record.get(field);
        if value.is_none() {
            debug!(field = %field, "Record has no value for field, skipping");
        }
        value
    }
}

/// Occurrence for a field: required fields constrain, optional fields score.
fn occur_for(required: bool, scoring: bool) -> Occur {
    match (required, scoring) {
        (false, _) => Occur::Should,
        (true, true) => Occur::Must,
        (true, false) => Occur::Filter,
    }
}

fn skip_mismatch(field: &str, kind: FieldKind, value: &FieldValue) {
    warn!(
        field = %field,
        kind = %kind,
        value_type = value.type_name(),
        "Record value does not fit field kind, skipping"
    );
}

/// Insert `boost` into a clause's parameter object when set.
fn with_boost(mut params: Map<String, Value>, boost: Option<f32>) -> Map<String, Value> {
    if let Some(boost) = boost {
        params.insert("boost".to_string(), json!(boost));
    }
    params
}

/// Build a `term` clause.
pub fn build_term_query(
    field: &str,
    value: Value,
    boost: Option<f32>,
    case_insensitive: bool,
) -> Value {
    let mut params = Map::new();
    params.insert("value".to_string(), value);
    if case_insensitive {
        params.insert("case_insensitive".to_string(), json!(true));
    }

    json!({ "term": { field: with_boost(params, boost) } })
}

/// Build a `match` clause.
pub fn build_match_query(
    field: &str,
    text: &str,
    fuzziness: Fuzziness,
    operator: MatchOperator,
    boost: Option<f32>,
) -> Value {
    let mut params = Map::new();
    params.insert("query".to_string(), json!(text));
    params.insert("fuzziness".to_string(), json!(fuzziness));
    params.insert("operator".to_string(), json!(operator.to_string()));

    json!({ "match": { field: with_boost(params, boost) } })
}

/// Build an inclusive `range` clause.
pub fn build_range_query(
    field: &str,
    gte: Value,
    lte: Value,
    format: Option<&str>,
    boost: Option<f32>,
) -> Value {
    let mut params = Map::new();
    params.insert("gte".to_string(), gte);
    params.insert("lte".to_string(), lte);
    if let Some(format) = format {
        params.insert("format".to_string(), json!(format));
    }

    json!({ "range": { field: with_boost(params, boost) } })
}

/// Build a `geo_distance` clause around a point.
pub fn build_geo_distance_query(
    field: &str,
    lat: f64,
    lon: f64,
    distance_km: f64,
    boost: Option<f32>,
) -> Value {
    let mut params = Map::new();
    params.insert("distance".to_string(), json!(format!("{}km", distance_km)));
    params.insert(field.to_string(), json!({ "lat": lat, "lon": lon }));

    json!({ "geo_distance": with_boost(params, boost) })
}

/// Build an `ids` clause matching documents by `_id`.
pub fn build_ids_query(ids: &[&str]) -> Value {
    json!({ "ids": { "values": ids } })
}

/// Wrap an accumulated document into a search request body.
pub fn build_search_body(
    document: &BoolQueryDocument,
    size: usize,
    minimum_should_match: Option<&str>,
) -> Value {
    json!({
        "size": size,
        "query": document.to_bool_query(minimum_should_match)
    })
}

/// Inclusive `[date - days, date + days]`, or `None` when out of calendar range.
fn date_window(date: NaiveDate, days: u32) -> Option<(NaiveDate, NaiveDate)> {
    let days = Days::new(u64::from(days));
    Some((date.checked_sub_days(days)?, date.checked_add_days(days)?))
}

impl FieldQueryVisitor for OpenSearchQueryBuilder<'_> {
    type Document = BoolQueryDocument;

    fn visit_keyword(&self, field: &KeywordField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some(text) = value.as_text() else {
            skip_mismatch(&field.name, FieldKind::Keyword, value);
            return;
        };

        document.add_clause(
            occur_for(field.required, false),
            build_term_query(&field.name, json!(text), field.boost, field.case_insensitive),
        );
    }

    fn visit_text(&self, field: &TextField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some(text) = value.as_text() else {
            skip_mismatch(&field.name, FieldKind::Text, value);
            return;
        };
        if text.trim().is_empty() {
            debug!(field = %field.name, "Empty text value, skipping");
            return;
        }

        document.add_clause(
            occur_for(field.required, true),
            build_match_query(
                &field.name,
                text,
                field.fuzziness,
                field.operator,
                field.boost,
            ),
        );
    }

    fn visit_number(&self, field: &NumberField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some(number) = value.as_number().filter(|n| n.is_finite()) else {
            skip_mismatch(&field.name, FieldKind::Number, value);
            return;
        };

        let (gte, lte) = (number - field.tolerance, number + field.tolerance);
        if !gte.is_finite() || !lte.is_finite() {
            warn!(
                field = %field.name,
                value = number,
                tolerance = field.tolerance,
                "Number range out of range, skipping"
            );
            return;
        }

        document.add_clause(
            occur_for(field.required, false),
            build_range_query(&field.name, json!(gte), json!(lte), None, field.boost),
        );
    }

    fn visit_date(&self, field: &DateField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some(text) = value.as_text() else {
            skip_mismatch(&field.name, FieldKind::Date, value);
            return;
        };

        let date = match NaiveDate::parse_from_str(text.trim(), &field.format) {
            Ok(date) => date,
            Err(e) => {
                warn!(
                    field = %field.name,
                    value = %text,
                    format = %field.format,
                    error = %e,
                    "Could not parse date value, skipping"
                );
                return;
            }
        };

        let Some((from, to)) = date_window(date, field.window_days) else {
            warn!(field = %field.name, date = %date, "Date window out of range, skipping");
            return;
        };

        document.add_clause(
            occur_for(field.required, false),
            build_range_query(
                &field.name,
                json!(from.format(RANGE_DATE_FORMAT).to_string()),
                json!(to.format(RANGE_DATE_FORMAT).to_string()),
                Some(RANGE_DATE_FORMAT_DSL),
                field.boost,
            ),
        );
    }

    fn visit_location(&self, field: &LocationField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some((lat, lon)) = value.as_location() else {
            skip_mismatch(&field.name, FieldKind::Location, value);
            return;
        };
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            warn!(field = %field.name, lat, lon, "Coordinates out of range, skipping");
            return;
        }

        document.add_clause(
            occur_for(field.required, false),
            build_geo_distance_query(&field.name, lat, lon, field.distance_km, field.boost),
        );
    }

    fn visit_boolean(&self, field: &BooleanField, document: &mut BoolQueryDocument) {
        let Some(value) = self.value_of(&field.name) else {
            return;
        };
        let Some(flag) = value.as_bool() else {
            skip_mismatch(&field.name, FieldKind::Boolean, value);
            return;
        };

        document.add_clause(
            occur_for(field.required, false),
            build_term_query(&field.name, json!(flag), field.boost, false),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_search_shared::{EntityConfig, FieldConfig};

    fn build(field: impl Into<FieldConfig>, record: &EntityRecord) -> BoolQueryDocument {
        let builder = OpenSearchQueryBuilder::new(record);
        let mut document = BoolQueryDocument::new();
        field.into().accept(&builder, &mut document);
        document
    }

    #[test]
    fn test_keyword_term_clause() {
        let record = EntityRecord::new().with_value("national_id", "AB-123");
        let document = build(
            KeywordField::new("national_id").with_case_insensitive(true),
            &record,
        );

        let should = document.clauses(Occur::Should);
        assert_eq!(should.len(), 1);
        assert_eq!(should[0]["term"]["national_id"]["value"], "AB-123");
        assert_eq!(should[0]["term"]["national_id"]["case_insensitive"], true);
        assert!(should[0]["term"]["national_id"].get("boost").is_none());
    }

    #[test]
    fn test_required_keyword_goes_to_filter() {
        let record = EntityRecord::new().with_value("national_id", "AB-123");
        let document = build(KeywordField::new("national_id").with_required(true), &record);

        assert!(document.clauses(Occur::Should).is_empty());
        assert_eq!(document.clauses(Occur::Filter).len(), 1);
        assert!(document.clauses(Occur::Filter)[0]["term"]["national_id"]
            .get("case_insensitive")
            .is_none());
    }

    #[test]
    fn test_text_match_clause() {
        let record = EntityRecord::new().with_value("full_name", "Ada Lovelace");
        let document = build(
            TextField::new("full_name")
                .with_boost(2.0)
                .with_operator(MatchOperator::And),
            &record,
        );

        let clause = &document.clauses(Occur::Should)[0]["match"]["full_name"];
        assert_eq!(clause["query"], "Ada Lovelace");
        assert_eq!(clause["fuzziness"], "AUTO");
        assert_eq!(clause["operator"], "and");
        assert_eq!(clause["boost"], 2.0);
    }

    #[test]
    fn test_required_text_goes_to_must() {
        let record = EntityRecord::new().with_value("full_name", "Ada");
        let document = build(
            TextField::new("full_name")
                .with_required(true)
                .with_fuzziness(Fuzziness::Edits(1)),
            &record,
        );

        let must = document.clauses(Occur::Must);
        assert_eq!(must.len(), 1);
        assert_eq!(must[0]["match"]["full_name"]["fuzziness"], 1);
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let record = EntityRecord::new().with_value("full_name", "   ");
        let document = build(TextField::new("full_name"), &record);
        assert!(document.is_empty());
    }

    #[test]
    fn test_number_range_clause() {
        let record = EntityRecord::new().with_value("age", 40.0);
        let document = build(NumberField::new("age").with_tolerance(2.0), &record);

        let range = &document.clauses(Occur::Should)[0]["range"]["age"];
        assert_eq!(range["gte"], 38.0);
        assert_eq!(range["lte"], 42.0);
        assert!(range.get("format").is_none());
    }

    #[test]
    fn test_number_range_overflow_is_skipped() {
        let record = EntityRecord::new().with_value("revenue", 1.7e308);
        let document = build(
            NumberField::new("revenue")
                .with_tolerance(1e308)
                .with_required(true),
            &record,
        );
        assert!(document.is_empty());
    }

    #[test]
    fn test_date_window_out_of_calendar_range() {
        assert!(date_window(NaiveDate::MAX, 1).is_none());
        assert!(date_window(NaiveDate::MIN, 1).is_none());
        assert!(date_window(NaiveDate::MAX, 0).is_some());

        let record = EntityRecord::new().with_value(
            "birth_date",
            NaiveDate::MAX.format(RANGE_DATE_FORMAT).to_string(),
        );
        let document = build(DateField::new("birth_date").with_window_days(1), &record);
        assert!(document.is_empty());
    }

    #[test]
    fn test_date_range_clause() {
        let record = EntityRecord::new().with_value("birth_date", "10/12/1815");
        let document = build(
            DateField::new("birth_date")
                .with_format("%d/%m/%Y")
                .with_window_days(3)
                .with_required(true),
            &record,
        );

        let range = &document.clauses(Occur::Filter)[0]["range"]["birth_date"];
        assert_eq!(range["gte"], "1815-12-07");
        assert_eq!(range["lte"], "1815-12-13");
        assert_eq!(range["format"], "yyyy-MM-dd");
    }

    #[test]
    fn test_unparseable_date_is_skipped() {
        let record = EntityRecord::new().with_value("birth_date", "December 1815");
        let document = build(DateField::new("birth_date"), &record);
        assert!(document.is_empty());
    }

    #[test]
    fn test_location_geo_distance_clause() {
        let record = EntityRecord::new().with_location("home", 51.5, -0.12);
        let document = build(LocationField::new("home", 25.0).with_boost(0.5), &record);

        let geo = &document.clauses(Occur::Should)[0]["geo_distance"];
        assert_eq!(geo["distance"], "25km");
        assert_eq!(geo["home"]["lat"], 51.5);
        assert_eq!(geo["home"]["lon"], -0.12);
        assert_eq!(geo["boost"], 0.5);
    }

    #[test]
    fn test_out_of_range_coordinates_are_skipped() {
        let record = EntityRecord::new().with_location("home", 95.0, 0.0);
        let document = build(LocationField::new("home", 25.0), &record);
        assert!(document.is_empty());
    }

    #[test]
    fn test_boolean_term_clause() {
        let record = EntityRecord::new().with_value("deceased", false);
        let document = build(BooleanField::new("deceased"), &record);

        assert_eq!(
            document.clauses(Occur::Should)[0]["term"]["deceased"]["value"],
            false
        );
    }

    #[test]
    fn test_missing_value_adds_nothing() {
        let record = EntityRecord::new();
        for field in [
            FieldConfig::from(KeywordField::new("a")),
            FieldConfig::from(TextField::new("b")),
            FieldConfig::from(NumberField::new("c")),
            FieldConfig::from(DateField::new("d")),
            FieldConfig::from(LocationField::new("e", 1.0)),
            FieldConfig::from(BooleanField::new("f")),
        ] {
            assert!(build(field, &record).is_empty());
        }
    }

    #[test]
    fn test_mismatched_value_adds_nothing() {
        let record = EntityRecord::new()
            .with_value("a", 1.0)
            .with_value("b", true)
            .with_value("c", "forty")
            .with_value("d", 19.0)
            .with_value("e", "London")
            .with_value("f", "yes");

        for field in [
            FieldConfig::from(KeywordField::new("a")),
            FieldConfig::from(TextField::new("b")),
            FieldConfig::from(NumberField::new("c")),
            FieldConfig::from(DateField::new("d")),
            FieldConfig::from(LocationField::new("e", 1.0)),
            FieldConfig::from(BooleanField::new("f")),
        ] {
            assert!(build(field, &record).is_empty());
        }
    }

    #[test]
    fn test_all_fields_into_one_document() {
        let entity = EntityConfig::new("person")
            .with_field(KeywordField::new("national_id").with_required(true))
            .with_field(TextField::new("full_name"))
            .with_field(NumberField::new("age").with_tolerance(1.0))
            .with_field(BooleanField::new("deceased"));
        let record = EntityRecord::new()
            .with_value("national_id", "AB-123")
            .with_value("full_name", "Ada Lovelace")
            .with_value("deceased", true);

        let builder = OpenSearchQueryBuilder::new(&record);
        let mut document = BoolQueryDocument::new();
        entity.accept_all(&builder, &mut document);

        assert_eq!(document.clause_count(), 3);
        assert_eq!(document.clauses(Occur::Filter).len(), 1);
        assert_eq!(document.clauses(Occur::Should).len(), 2);
    }

    #[test]
    fn test_build_search_body() {
        let mut document = BoolQueryDocument::new();
        document.add_clause(Occur::Should, build_term_query("a", json!("b"), None, false));
        document.add_clause(Occur::MustNot, build_ids_query(&["doc-1"]));

        let body = build_search_body(&document, 25, Some("1"));

        assert_eq!(body["size"], 25);
        assert_eq!(body["query"]["bool"]["minimum_should_match"], "1");
        assert_eq!(body["query"]["bool"]["must_not"][0]["ids"]["values"][0], "doc-1");
    }

    #[test]
    fn test_occur_for() {
        assert_eq!(occur_for(false, true), Occur::Should);
        assert_eq!(occur_for(false, false), Occur::Should);
        assert_eq!(occur_for(true, true), Occur::Must);
        assert_eq!(occur_for(true, false), Occur::Filter);
    }
}
