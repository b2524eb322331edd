//! Script execution.
//!
//! Runs a script through its lifecycle: `tearUp`, then `default` or
//! `execute`, then `tearDown`. Phases run strictly in sequence in a Lua state
//! created for this call.

use std::path::Path;

use mlua::prelude::*;
use serde_json::Value;

use super::context::{lua_to_json, ScriptContext};
use super::output::LogLevel;
use super::module::ScriptModule;
use crate::error::Result;

/// Run the script at `path` with `context`.
///
/// Every phase is announced through the context's log sink before it is
/// called. `tearDown` receives `(ctx, result, tearUpResult)` and its return
/// value is discarded; if it fails, the invocation fails even though the
/// main phase succeeded.
///
/// # Returns
///
/// The main phase's return value as JSON (`null` when it returns nothing).
///
/// # Errors
///
/// Fails before any phase runs when the file is missing, cannot be loaded,
/// or exports no entry point. A Lua error raised by a phase is logged as
/// `Error in <phase>(): <message>` and returned unchanged.
pub fn run_script(path: &Path, context: &ScriptContext) -> Result<Value> {
    run_module(&ScriptModule::load(path)?, context)
}

/// Run an already loaded module with `context`.
///
/// The chunk is not evaluated again, so a caller can read the module's
/// exports (its `variables`, say) before the lifecycle starts.
pub fn run_module(module: &ScriptModule, context: &ScriptContext) -> Result<Value> {
    let script = module.resolve()?;
    let lua = module.lua();

    let ctx = context.to_lua_table(lua)?;

    let tear_up_result = match &script.tear_up {
        Some(tear_up) => run_phase(context, "tearUp", || {
            tear_up.call::<LuaValue>(ctx.clone())
        })?,
        None => LuaValue::Nil,
    };

    let (entry_point, main) = &script.main;
    let result = run_phase(context, entry_point.name(), || {
        main.call::<LuaValue>((ctx.clone(), tear_up_result.clone()))
    })?;

    if let Some(tear_down) = &script.tear_down {
        run_phase(context, "tearDown", || {
            tear_down.call::<()>((ctx.clone(), result.clone(), tear_up_result.clone()))
        })?;
    }

    lua_to_json(lua, result).map_err(|e| {
        context.log(LogLevel::Error, format!("Error converting result: {e}"));
        e.into()
    })
}

fn run_phase<R>(
    context: &ScriptContext,
    phase: &str,
    call: impl FnOnce() -> LuaResult<R>,
) -> Result<R> {
    context.log(LogLevel::Log, format!("Running {phase}()"));
    call().map_err(|e| {
        context.log(LogLevel::Error, format!("Error in {phase}(): {e}"));
        log::debug!("{}() failed: {:?}", phase, e);
        e.into()
    })
}
