//! The per-invocation context passed to every lifecycle phase.

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use serde_json::Value;

use super::console::{create_console, log_function, Timestamp};
use super::output::{null_sink, LogLevel, LogLine, LogSink};
use crate::config::Params;
use crate::env::EnvironmentSnapshot;

/// Everything a script sees as its first argument.
#[derive(Clone)]
pub struct ScriptContext {
    pub env: EnvironmentSnapshot,
    pub tmp_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    /// Caller-supplied parameter bag, exposed as `ctx.params`.
    pub params: Params,
    /// Interpolated default parameters, spread as top-level fields.
    pub default_params: Params,
    /// Spread last, replacing any field of the same name.
    pub overrides: Params,
    /// Whether `ctx.console` is provided.
    pub console: bool,
    log: LogSink,
}

impl ScriptContext {
    pub fn new(env: EnvironmentSnapshot, tmp_dir: impl Into<PathBuf>) -> Self {
        Self {
            env,
            tmp_dir: tmp_dir.into(),
            config_path: None,
            params: Params::new(),
            default_params: Params::new(),
            overrides: Params::new(),
            console: true,
            log: null_sink(),
        }
    }

    pub fn with_config_path(mut self, path: Option<&Path>) -> Self {
        self.config_path = path.map(Path::to_path_buf);
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_default_params(mut self, params: Params) -> Self {
        self.default_params = params;
        self
    }

    pub fn with_overrides(mut self, overrides: Params) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log = sink;
        self
    }

    pub fn log_sink(&self) -> &LogSink {
        &self.log
    }

    /// Send a line to this invocation's sink.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        (self.log)(&LogLine::new(level, message));
    }

    /// Build the Lua table handed to the script.
    pub fn to_lua_table(&self, lua: &Lua) -> LuaResult<LuaTable> {
        let ctx = lua.create_table()?;

        for (key, value) in &self.default_params {
            ctx.set(key.as_str(), json_to_lua(lua, value)?)?;
        }

        let env = lua.create_table()?;
        for (name, value) in &self.env {
            env.set(name.as_str(), value.as_str())?;
        }
        ctx.set("env", env)?;
        ctx.set("tmpDir", self.tmp_dir.display().to_string())?;
        ctx.set(
            "configPath",
            self.config_path.as_ref().map(|p| p.display().to_string()),
        )?;
        ctx.set("params", json_to_lua(lua, &Value::Object(self.params.clone()))?)?;
        ctx.set("log", log_function(lua, LogLevel::Log, self.log.clone())?)?;
        ctx.set(
            "now",
            lua.create_function(|_, ()| Ok(Timestamp::now()))?,
        )?;

        if self.console {
            ctx.set("console", create_console(lua, &self.log)?)?;
        }

        for (key, value) in &self.overrides {
            ctx.set(key.as_str(), json_to_lua(lua, value)?)?;
        }

        Ok(ctx)
    }
}

/// JSON to Lua, with `null` becoming `nil`.
pub(crate) fn json_to_lua(lua: &Lua, value: &Value) -> LuaResult<LuaValue> {
    let options = LuaSerializeOptions::new()
        .serialize_none_to_null(false)
        .serialize_unit_to_null(false);
    lua.to_value_with(value, options)
}

/// Lua to JSON. Values JSON cannot hold, such as functions, are skipped.
pub(crate) fn lua_to_json(lua: &Lua, value: LuaValue) -> LuaResult<Value> {
    let options = LuaDeserializeOptions::new().deny_unsupported_types(false);
    lua.from_value_with(value, options)
}
