//! Fuzzy matching implementation.
//!
//! Uses SkimMatcherV2 for fuzzy matching with scoring.

use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::library::ScriptEntry;

/// Shared matcher instance, built on first use.
static GLOBAL_MATCHER: OnceLock<SkimMatcherV2> = OnceLock::new();

fn global_matcher() -> &'static SkimMatcherV2 {
    GLOBAL_MATCHER.get_or_init(|| SkimMatcherV2::default().ignore_case())
}

/// Filter script entries by a query.
///
/// Returns `(index, score)` pairs sorted by score, best first. Ties keep
/// the original (alphabetical) order. An empty query keeps every entry with
/// score 0.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use scriptrun::filter::filter_scripts;
/// use scriptrun::ScriptEntry;
///
/// let entries = vec![
///     ScriptEntry { path: PathBuf::from("build.lua"), name: "build.lua".into(), description: None },
///     ScriptEntry { path: PathBuf::from("db/seed.lua"), name: "db/seed.lua".into(), description: None },
/// ];
///
/// let results = filter_scripts("seed", &entries, false);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].0, 1);
/// ```
pub fn filter_scripts(
    query: &str,
    entries: &[ScriptEntry],
    search_descriptions: bool,
) -> Vec<(usize, i64)> {
    let query = query.trim();
    if query.is_empty() {
        return (0..entries.len()).map(|i| (i, 0)).collect();
    }

    let matcher = global_matcher();
    let mut found: Vec<(usize, i64)> = Vec::with_capacity(entries.len().min(32));

    for (idx, entry) in entries.iter().enumerate() {
        if let Some(score) = matcher.fuzzy_match(&entry.name, query) {
            found.push((idx, score));
            continue;
        }

        if !search_descriptions {
            continue;
        }
        if let Some(score) = entry
            .description
            .as_deref()
            .and_then(|desc| matcher.fuzzy_match(desc, query))
        {
            // Description hits rank below name hits
            found.push((idx, score / 2));
        }
    }

    found.sort_by(|a, b| b.1.cmp(&a.1));
    found
}

/// Character indices of `text` matched by `query`, for highlighting.
///
/// Empty when the query is empty or does not match.
///
/// ```
/// use scriptrun::filter::match_indices;
///
/// assert_eq!(match_indices("dep", "deploy.lua"), vec![0, 1, 2]);
/// ```
pub fn match_indices(query: &str, text: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }

    global_matcher()
        .fuzzy_indices(text, query)
        .map(|(_, indices)| indices)
        .unwrap_or_default()
}

/// Whether `query` fuzzy-matches `text`. An empty query matches everything.
pub fn matches(query: &str, text: &str) -> bool {
    let query = query.trim();
    query.is_empty() || global_matcher().fuzzy_match(text, query).is_some()
}
