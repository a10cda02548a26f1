//! OpenSearch bool query accumulator.

use serde_json::{json, Map, Value};

use entity_search_shared::{Occur, QueryDocument};

/// Key of an occurrence inside an OpenSearch `bool` query.
pub fn occur_key(occur: Occur) -> &'static str {
    match occur {
        Occur::Must => "must",
        Occur::Should => "should",
        Occur::Filter => "filter",
        Occur::MustNot => "must_not",
    }
}

/// Collects clauses for a single OpenSearch `bool` query.
#[derive(Debug, Clone, Default)]
pub struct BoolQueryDocument {
    must: Vec<Value>,
    should: Vec<Value>,
    filter: Vec<Value>,
    must_not: Vec<Value>,
}

impl BoolQueryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clauses added under `occur`, in insertion order.
    pub fn clauses(&self, occur: Occur) -> &[Value] {
        match occur {
            Occur::Must => &self.must,
            Occur::Should => &self.should,
            Occur::Filter => &self.filter,
            Occur::MustNot => &self.must_not,
        }
    }

    /// Render the `{"bool": {...}}` query.
    ///
    /// Empty occurrences are omitted. `minimum_should_match` is only emitted
    /// when there is at least one should clause.
    pub fn to_bool_query(&self, minimum_should_match: Option<&str>) -> Value {
        let mut bool_query = Map::new();

        for occur in Occur::ALL {
            let clauses = self.clauses(occur);
            if !clauses.is_empty() {
                bool_query.insert(occur_key(occur).to_string(), json!(clauses));
            }
        }

        if !self.should.is_empty() {
            if let Some(msm) = minimum_should_match {
                bool_query.insert("minimum_should_match".to_string(), json!(msm));
            }
        }

        json!({ "bool": bool_query })
    }
}

impl QueryDocument for BoolQueryDocument {
    type Clause = Value;

    fn add_clause(&mut self, occur: Occur, clause: Value) {
        match occur {
            Occur::Must => self.must.push(clause),
            Occur::Should => self.should.push(clause),
            Occur::Filter => self.filter.push(clause),
            Occur::MustNot => self.must_not.push(clause),
        }
    }

    fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.filter.len() + self.must_not.len()
    }
}
