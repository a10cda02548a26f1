//! Record input and query output.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::AppError;
use entity_search_repository::BatchBuildSummary;
use entity_search_shared::EntityRecord;

/// Parse records from JSON: either a single record object or an array of them.
pub fn parse_records(json: &str) -> Result<Vec<EntityRecord>, AppError> {
    let value: Value = serde_json::from_str(json)?;
    let records = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(records)
}

/// Read records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<EntityRecord>, AppError> {
    let json = fs::read_to_string(path)?;
    parse_records(&json)
}

/// Render a batch summary as a JSON array, one entry per record.
///
/// Successful entries carry the query body, failed entries the error message.
pub fn render_summary(summary: &BatchBuildSummary) -> Value {
    let entries: Vec<Value> = summary
        .results
        .iter()
        .map(|result| {
            let mut entry = json!({
                "index": result.index,
                "record_id": result.record_id,
            });
            match (&result.query, &result.error) {
                (_, Some(error)) => entry["error"] = json!(error.to_string()),
                (Some(query), None) => entry["query"] = query.clone(),
                (None, None) => {}
            }
            entry
        })
        .collect();

    Value::Array(entries)
}
