//! Recursive script discovery.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

/// File extensions recognized as script sources.
pub const SCRIPT_EXTENSIONS: &[&str] = &["lua"];

/// Glob options: `*` stays within one path segment and dotfiles are matchable.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<(Pattern, bool)>,
}

impl ExcludeSet {
    /// Compile `patterns`. Invalid globs are dropped with a warning.
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some((pattern, !raw.contains('/'))),
                Err(e) => {
                    log::warn!("Ignoring invalid exclude pattern '{}': {}", raw, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Whether `relative` (a `/`-separated path under the base directory) is excluded.
    ///
    /// Patterns without a slash are also tested against the base name, so
    /// `*.test.lua` excludes matching files at any depth.
    pub fn is_excluded(&self, relative: &str) -> bool {
        let base_name = relative.rsplit('/').next().unwrap_or(relative);
        self.patterns.iter().any(|(pattern, match_base)| {
            pattern.matches_with(relative, MATCH_OPTIONS)
                || (*match_base && pattern.matches_with(base_name, MATCH_OPTIONS))
        })
    }

    /// Whether there are no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Recursively find script files under `base_dir`.
///
/// Entries matching any of `exclude_patterns` (relative to `base_dir`) are
/// skipped; an excluded directory is not descended into. Unreadable
/// subdirectories contribute nothing. Symlinked directories are followed,
/// but each real directory is walked at most once. The result is sorted.
pub fn discover_scripts(base_dir: &Path, exclude_patterns: &[String]) -> Vec<PathBuf> {
    let excludes = ExcludeSet::new(exclude_patterns);
    let mut scripts = Vec::new();
    let mut visited = HashSet::new();
    walk(base_dir, base_dir, &excludes, &mut visited, &mut scripts);
    scripts.sort();
    scripts
}

/// Whether `path` has a recognized script extension.
pub fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}

/// Path of `path` relative to `base_dir`, with `/` separators.
///
/// Falls back to the full path when `path` is outside `base_dir`.
pub fn relative_name(base_dir: &Path, path: &Path) -> String {
    match path.strip_prefix(base_dir) {
        Ok(relative) => relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

fn walk(
    base_dir: &Path,
    dir: &Path,
    excludes: &ExcludeSet,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<PathBuf>,
) {
    let real = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    if !visited.insert(real) {
        log::debug!("Skipping already visited directory {}", dir.display());
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let relative = relative_name(base_dir, &path);

        if excludes.is_excluded(&relative) {
            log::debug!("Excluded {}", relative);
            continue;
        }

        let is_dir = match entry.file_type() {
            Ok(file_type) if file_type.is_symlink() => path.is_dir(),
            Ok(file_type) => file_type.is_dir(),
            Err(_) => continue,
        };

        if is_dir {
            walk(base_dir, &path, excludes, visited, out);
        } else if is_script_file(&path) {
            out.push(path);
        }
    }
}
