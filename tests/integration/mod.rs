//! Integration tests for scriptrun.
//!
//! - `fixtures` - Temporary projects with scripts, config and env files
//! - `cli_tests` - CLI interface tests
//! - `config_tests` - Configuration layering and environment loading
//! - `runner_tests` - Lifecycle execution through the library API
//! - `library_tests` - Events, prompting and per-call options
//! - `snapshot_tests` - Output snapshot tests using insta

pub mod config_tests;
pub mod library_tests;
pub mod runner_tests;
pub mod snapshot_tests;
