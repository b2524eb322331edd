//! Script discovery.
//!
//! Walks the scripts directory and applies exclusion globs relative to it.

mod walker;

pub use walker::{
    discover_scripts, is_script_file, relative_name, ExcludeSet, SCRIPT_EXTENSIONS,
};
