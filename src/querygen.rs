//! SPARQL query generation from exploration summaries
//!
//! Given the rows of a summary exploration (`p`, `count`), [`QueryGen`]
//! writes a flat query that projects every single-valued predicate of one
//! node as its own variable. Multi-valued predicates are left out since one
//! row cannot hold them.

use crate::rdf::NamespaceManager;
use crate::sparql::Record;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Count value marking a predicate with exactly one value.
///
/// Compared as a string: summary counts arrive as literal text.
pub const SINGLE_VALUE: &str = "1";

/// Hands out unique variable names, suffixing repeats with `_2`, `_3`, ...
#[derive(Debug, Default)]
pub struct VarNameTracker {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl VarNameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as taken, e.g. the main variable of a query
    pub fn reserve(&mut self, name: &str) {
        self.counts.entry(name.to_string()).or_insert(1);
        self.used.insert(name.to_string());
    }

    /// Unique name for `base`
    pub fn get_unique_name(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        let mut name = if *count == 1 {
            base.to_string()
        } else {
            format!("{}_{}", base, count)
        };
        while self.used.contains(&name) {
            *count += 1;
            name = format!("{}_{}", base, count);
        }
        self.used.insert(name.clone());
        name
    }
}

/// A predicate selected for projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProperty {
    /// Predicate IRI as reported by the endpoint
    pub uri: String,
    /// `prefix:local` form, or `<uri>` when no prefix matches
    pub prefixed: String,
    /// SPARQL variable name, unique within one query
    pub var_name: String,
}

/// Generator for flat property queries
#[derive(Debug, Clone)]
pub struct QueryGen {
    prefixes: NamespaceManager,
}

impl QueryGen {
    pub fn new(prefixes: NamespaceManager) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &NamespaceManager {
        &self.prefixes
    }

    /// Compact a predicate IRI with the first matching prefix
    pub fn prefixed_property(&self, uri: &str) -> String {
        self.prefixes.compact_or_iri(uri)
    }

    /// Variable name for a prefixed property: the part after the last `:`,
    /// with `-`, `:` and `#` (and any other non-word character) turned into `_`
    pub fn sanitize_variable_name(&self, prefixed: &str) -> String {
        let local = match prefixed.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
            // raw IRI: use its last path or fragment segment
            Some(iri) => iri
                .rsplit(|c: char| c == '/' || c == '#' || c == ':')
                .next()
                .unwrap_or(iri),
            None => prefixed.rsplit(':').next().unwrap_or(prefixed),
        };
        let name: String = local
            .chars()
            .map(|c| match c {
                '-' | ':' | '#' => '_',
                c if c.is_alphanumeric() || c == '_' => c,
                _ => '_',
            })
            .collect();
        if name.is_empty() {
            "prop".to_string()
        } else {
            name
        }
    }

    /// Single-valued properties of the records, in record order
    pub fn properties(&self, records: &[Record], main_var: &str) -> Vec<SynthesizedProperty> {
        let mut tracker = VarNameTracker::new();
        tracker.reserve(main_var);
        records
            .iter()
            .filter(|record| record.get("count") == Some(SINGLE_VALUE))
            .filter_map(|record| {
                let uri = record.get("p");
                if uri.is_none() {
                    debug!("skipping record without predicate: {:?}", record);
                }
                uri
            })
            .map(|uri| {
                let prefixed = self.prefixed_property(uri);
                let var_name = tracker.get_unique_name(&self.sanitize_variable_name(&prefixed));
                SynthesizedProperty {
                    uri: uri.to_string(),
                    prefixed,
                    var_name,
                }
            })
            .collect()
    }

    /// Generate a query projecting the single-valued properties of `main_value`.
    ///
    /// Properties from index `project_limit` on are still emitted but
    /// commented out; `None` projects all of them.
    pub fn gen(
        &self,
        records: &[Record],
        main_var: &str,
        main_value: &str,
        project_limit: Option<usize>,
    ) -> String {
        let properties = self.properties(records, main_var);
        let comment = |i: usize| match project_limit {
            Some(limit) if i >= limit => "#",
            _ => "",
        };

        let mut lines: Vec<String> = self.prefixes.declarations();
        lines.push(format!("SELECT ?{}", main_var));
        for (i, prop) in properties.iter().enumerate() {
            lines.push(format!("{}  ?{}", comment(i), prop.var_name));
        }
        lines.push("WHERE {".to_string());
        lines.push(format!("  VALUES (?{}) {{ ({}) }}", main_var, main_value));
        lines.push("  OPTIONAL {".to_string());
        for (i, prop) in properties.iter().enumerate() {
            lines.push(format!("    # {}", prop.uri));
            lines.push(format!(
                "   {} ?{} {} ?{} .",
                comment(i),
                main_var,
                prop.prefixed,
                prop.var_name
            ));
        }
        lines.push("  }".to_string());
        lines.push("}".to_string());
        lines.join("\n")
    }
}
