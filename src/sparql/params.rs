//! Template parameter substitution
//!
//! Placeholders come in two spellings: `?{name}` and the Jinja-style
//! `{{ name }}`. Substitution is a single pass, so values containing
//! placeholder syntax are inserted literally.

use crate::error::{ExploreError, ExploreResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Parameter bindings for a query template
pub type Params = HashMap<String, String>;

/// Build [`Params`] from key/value pairs
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\?\{\s*(\w+)\s*\}|\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

fn placeholder_name<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Distinct placeholder names in order of first appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let name = placeholder_name(&caps);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every placeholder with its bound value.
///
/// Fails with `MissingParameter` for the first placeholder without a binding;
/// bindings without a placeholder are ignored.
pub fn apply_params(template: &str, params: &Params) -> ExploreResult<String> {
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| !params.contains_key(name))
    {
        return Err(ExploreError::MissingParameter { name: missing });
    }
    let replaced = placeholder_regex().replace_all(template, |caps: &regex::Captures| {
        params
            .get(placeholder_name(caps))
            .cloned()
            .unwrap_or_default()
    });
    Ok(replaced.into_owned())
}
