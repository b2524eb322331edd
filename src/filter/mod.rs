//! Fuzzy filtering for the script list.
//!
//! Matches a query against script names and, with lower priority, descriptions.

mod fuzzy;

pub use fuzzy::{filter_scripts, match_indices, matches};
