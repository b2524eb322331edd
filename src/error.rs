//! Custom error types for scriptrun.
//!
//! Uses thiserror for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Exit codes for scriptrun.
pub mod exit_code {
    /// Success.
    pub const SUCCESS: i32 = 0;
    /// Any failure: script error, missing directory, fatal startup error.
    pub const FAILURE: i32 = 1;
}

/// Main error type for scriptrun.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The invoked script path does not resolve to a file.
    #[error("Script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    /// Script not found with suggestions.
    #[error("Script not found: {path}\n\nDid you mean: {suggestions}?\n\nRun 'scriptrun run --list' to see all available scripts.")]
    ScriptNotFoundWithSuggestions { path: PathBuf, suggestions: String },

    /// The module exports neither `execute` nor `default`.
    #[error("Script {path} must export either an 'execute' function or a 'default' function")]
    MissingEntryPoint { path: PathBuf },

    /// The script source could not be loaded (read or compile failure).
    #[error("Failed to load script {path}: {source}")]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: mlua::Error,
    },

    /// A lifecycle phase raised an error. Passed through untouched.
    #[error(transparent)]
    Lua(#[from] mlua::Error),

    /// The scripts directory does not exist.
    #[error("Scripts directory not found: {path}\n\nTip: Run 'scriptrun init' or pass --scripts-dir.")]
    ScriptsDirNotFound { path: PathBuf },

    /// The requested working directory does not exist.
    #[error("Working directory not found: {path}")]
    WorkingDirectoryNotFound { path: PathBuf },

    /// The user cancelled a variable prompt.
    #[error("Prompt cancelled, script was not executed")]
    PromptCancelled,

    /// A prompter failed for a reason other than cancellation.
    #[error("Failed to collect variables: {message}")]
    Prompt { message: String },

    /// IO error with path context.
    #[error("Failed to {operation} '{path}': {source}")]
    IoWithContext {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        exit_code::FAILURE
    }

    /// Wrap an IO error with the operation and path it failed on.
    pub fn io(operation: &str, path: &Path, source: std::io::Error) -> Self {
        ScriptError::IoWithContext {
            operation: operation.to_string(),
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a script not found error with suggestions based on known script names.
    pub fn script_not_found_with_suggestions(path: &Path, scripts: &[&str]) -> Self {
        let name = path.to_string_lossy();
        let suggestions = find_similar_scripts(&name, scripts);
        if suggestions.is_empty() {
            ScriptError::ScriptNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ScriptError::ScriptNotFoundWithSuggestions {
                path: path.to_path_buf(),
                suggestions: suggestions.join(", "),
            }
        }
    }
}

/// Find similar script names using simple string distance.
fn find_similar_scripts(name: &str, scripts: &[&str]) -> Vec<String> {
    let name_lower = name.trim_end_matches(".lua").to_lowercase();
    let mut matches: Vec<(String, usize)> = scripts
        .iter()
        .filter_map(|&s| {
            let s_lower = s.trim_end_matches(".lua").to_lowercase();
            let dist = simple_distance(&name_lower, &s_lower);
            if dist <= 3 || s_lower.contains(&name_lower) || name_lower.contains(&s_lower) {
                Some((s.to_string(), dist))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by_key(|(_, d)| *d);

    matches
        .into_iter()
        .take(3)
        .map(|(s, _)| format!("'{}'", s))
        .collect()
}

/// Simple Levenshtein distance calculation.
fn simple_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let len_a = a_chars.len();
    let len_b = b_chars.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    // Two rolling rows are enough for the distance itself
    let mut prev: Vec<usize> = (0..=len_b).collect();
    let mut curr = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr[0] = i;
        for j in 1..=len_b {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[len_b]
}

/// Result type alias for scriptrun operations.
pub type Result<T> = std::result::Result<T, ScriptError>;
