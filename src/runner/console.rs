//! Console facade and shallow value formatting for scripts.

use chrono::{DateTime, SecondsFormat, Utc};
use mlua::prelude::*;

use super::output::{LogLevel, LogLine, LogSink};

/// A point in time handed to scripts by `ctx.now()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// ISO-8601 form with millisecond precision, always in UTC.
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl LuaUserData for Timestamp {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| Ok(this.to_iso()));
        methods.add_method("iso", |_, this, ()| Ok(this.to_iso()));
        methods.add_method("unix", |_, this, ()| Ok(this.0.timestamp()));
        methods.add_method("millis", |_, this, ()| Ok(this.0.timestamp_millis()));
    }
}

/// Render `value` for a log line without looking inside it.
///
/// Tables never have their contents printed, so cyclic or deeply nested
/// values are safe.
pub fn safe_stringify(value: &LuaValue) -> String {
    match value {
        LuaValue::Nil => "nil".to_string(),
        LuaValue::Boolean(b) => b.to_string(),
        LuaValue::Integer(i) => i.to_string(),
        LuaValue::Number(n) => format_number(*n),
        LuaValue::String(s) => s.to_string_lossy().to_string(),
        LuaValue::Error(e) => format!("Error: {e}"),
        LuaValue::UserData(ud) => match ud.borrow::<Timestamp>() {
            Ok(ts) => ts.to_iso(),
            Err(_) => "[Object]".to_string(),
        },
        LuaValue::Table(t) => match t.raw_len() {
            0 => "[Object]".to_string(),
            n => format!("[Array({n})]"),
        },
        LuaValue::Function(_) => "[Function]".to_string(),
        _ => "[Object]".to_string(),
    }
}

/// Join safely-stringified arguments with single spaces.
pub fn format_args(args: LuaMultiValue) -> String {
    args.into_iter()
        .map(|value| safe_stringify(&value))
        .collect::<Vec<_>>()
        .join(" ")
}

// Lua prints integral floats with a trailing ".0"
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

/// A Lua function that formats its arguments and sends them to `sink` at `level`.
pub fn log_function(lua: &Lua, level: LogLevel, sink: LogSink) -> LuaResult<LuaFunction> {
    lua.create_function(move |_, args: LuaMultiValue| {
        sink(&LogLine::new(level, format_args(args)));
        Ok(())
    })
}

/// Build the `console` table with one method per [`LogLevel`].
pub fn create_console(lua: &Lua, sink: &LogSink) -> LuaResult<LuaTable> {
    let console = lua.create_table()?;
    for level in LogLevel::ALL {
        console.set(level.as_str(), log_function(lua, level, sink.clone())?)?;
    }
    Ok(console)
}
