//! SPARQL query results
//!
//! Results are exposed as plain tables: an ordered list of records, each an
//! ordered map from column name to the lexical value of the binding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One result row (column name → value)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, keeping the column's first position
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a column value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }

    /// Get a column value parsed as a number
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column)?.trim().parse().ok()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Tabular query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularResult {
    /// Column names in endpoint order
    pub columns: Vec<String>,
    /// Rows in endpoint order
    pub records: Vec<Record>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a result from records, collecting columns in order of first appearance
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for column in record.columns() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        Self { columns, records }
    }

    /// Decode a SPARQL 1.1 JSON results document
    pub fn from_sparql_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: SparqlJson = serde_json::from_str(json)?;

        if let Some(boolean) = doc.boolean {
            let record: Record = [("boolean", boolean.to_string())].into_iter().collect();
            return Ok(Self::new(vec!["boolean".to_string()], vec![record]));
        }

        let columns = doc.head.vars;
        let bindings = doc.results.map(|r| r.bindings).unwrap_or_default();
        let records = bindings
            .into_iter()
            .map(|mut row| {
                let mut record = Record::new();
                for column in &columns {
                    if let Some(binding) = row.shift_remove(column) {
                        record.insert(column.clone(), binding.value);
                    }
                }
                // variables missing from head.vars keep their document order
                for (column, binding) in row {
                    record.insert(column, binding.value);
                }
                record
            })
            .collect();

        Ok(Self { columns, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl IntoIterator for TabularResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a TabularResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Deserialize)]
struct SparqlJson {
    #[serde(default)]
    head: Head,
    #[serde(default)]
    results: Option<Results>,
    #[serde(default)]
    boolean: Option<bool>,
}

#[derive(Deserialize, Default)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct Results {
    bindings: Vec<IndexMap<String, Binding>>,
}

#[derive(Deserialize)]
struct Binding {
    value: String,
}
