//! Runner module for scriptrun.
//!
//! Loads Lua script modules fresh for every call and drives them through
//! their lifecycle.

mod console;
mod context;
mod executor;
pub mod output;
mod module;

pub use console::{format_args, safe_stringify, Timestamp};
pub use context::ScriptContext;
pub use executor::{run_module, run_script};
pub use output::{LogLevel, LogLine, LogSink};
pub use module::{EntryPoint, ResolvedScript, ScriptInfo, ScriptModule};
