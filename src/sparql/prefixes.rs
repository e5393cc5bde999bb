//! Merging endpoint `PREFIX` declarations into query text

use std::collections::BTreeSet;
use tracing::debug;

/// Whether the line is a `PREFIX` declaration (keyword matched case-insensitively)
pub fn is_prefix_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case("prefix"))
}

/// Declared prefix name, or the whole line when it cannot be parsed
fn declared_prefix(line: &str) -> &str {
    line.split_once(char::is_whitespace)
        .and_then(|(_, tail)| tail.split_once(':'))
        .map(|(name, _)| name.trim())
        .unwrap_or(line)
}

/// Merge endpoint prefix declarations into a query.
///
/// Declarations of prefixes the query already declares are skipped. When
/// nothing is missing the query is returned unmodified; otherwise all
/// declarations are emitted sorted, followed by a blank line and the query
/// body in its original order. Merging is idempotent.
pub fn merge_prefixes(query: &str, endpoint_prefixes: &[String]) -> String {
    let mut query_prefixes: BTreeSet<String> = BTreeSet::new();
    let mut body: Vec<&str> = Vec::new();
    for line in query.lines() {
        let trimmed = line.trim();
        if is_prefix_line(trimmed) {
            query_prefixes.insert(trimmed.to_string());
        } else {
            body.push(line);
        }
    }

    let declared: BTreeSet<&str> = query_prefixes.iter().map(|l| declared_prefix(l)).collect();
    let missing: BTreeSet<String> = endpoint_prefixes
        .iter()
        .map(|line| line.trim())
        .filter(|line| is_prefix_line(line) && !declared.contains(declared_prefix(line)))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        return query.to_string();
    }
    debug!("auto prefixing {} declarations", missing.len());

    let all_prefixes: BTreeSet<String> = query_prefixes.union(&missing).cloned().collect();
    let start = body.iter().position(|l| !l.trim().is_empty()).unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);

    format!(
        "{}\n\n{}",
        all_prefixes.into_iter().collect::<Vec<_>>().join("\n"),
        body[start..end].join("\n")
    )
}
