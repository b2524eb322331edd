//! Environment loading for scriptrun.
//!
//! Merges env files, the process environment and explicit variables into one
//! [`EnvironmentSnapshot`], then expands `${NAME}` placeholders in default
//! parameters against it.

mod interpolate;
mod loader;
mod snapshot;

pub use interpolate::{interpolate_params, interpolate_str, interpolate_value};
pub use loader::{load_environment, load_environment_with, read_env_file, LoadedEnvironment};
pub use snapshot::EnvironmentSnapshot;
