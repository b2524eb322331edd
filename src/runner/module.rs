//! Loading script modules and resolving their lifecycle functions.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mlua::prelude::*;

use crate::error::{Result, ScriptError};
use crate::prompt::{VariableDeclaration, VariableDefinition};

/// Which export supplies the main phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Default,
    Execute,
}

impl EntryPoint {
    /// Export name, also used in progress lines.
    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::Default => "default",
            EntryPoint::Execute => "execute",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The lifecycle functions of a loaded module.
#[derive(Debug, Clone)]
pub struct ResolvedScript {
    pub tear_up: Option<LuaFunction>,
    pub main: (EntryPoint, LuaFunction),
    pub tear_down: Option<LuaFunction>,
}

/// Static facts about a script, read without running any phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInfo {
    pub path: PathBuf,
    pub description: Option<String>,
    pub variables: Vec<VariableDefinition>,
    /// `None` when the script has no usable entry point.
    pub entry_point: Option<EntryPoint>,
}

/// A script file evaluated in its own Lua state.
///
/// Every load reads the file again and starts from a new state, so edits on
/// disk are picked up by the next load and nothing leaks between runs.
pub struct ScriptModule {
    lua: Lua,
    path: PathBuf,
    exports: Option<LuaTable>,
}

impl ScriptModule {
    /// Read and evaluate the script at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ScriptNotFound`] if `path` is not a file and
    /// [`ScriptError::ModuleLoad`] if the chunk fails to compile or run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ScriptError::ScriptNotFound {
                path: path.to_path_buf(),
            });
        }

        let source = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScriptError::ScriptNotFound {
                path: path.to_path_buf(),
            },
            _ => ScriptError::io("read script", path, e),
        })?;

        let lua = Lua::new();
        let module_error = |source: LuaError| ScriptError::ModuleLoad {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            prepend_package_path(&lua, dir).map_err(module_error)?;
        }

        let value: LuaValue = lua
            .load(source.as_str())
            .set_name(format!("@{}", path.display()))
            .eval()
            .map_err(module_error)?;

        let exports = match value {
            LuaValue::Table(table) => Some(table),
            // A bare function is the module's `default` export
            LuaValue::Function(main) => {
                let table = lua.create_table().map_err(module_error)?;
                table.set("default", main).map_err(module_error)?;
                Some(table)
            }
            LuaValue::Nil => None,
            other => {
                log::debug!(
                    "{} returned a {} instead of a table",
                    path.display(),
                    other.type_name()
                );
                None
            }
        };

        log::debug!("Loaded script module {}", path.display());

        Ok(Self {
            lua,
            path: path.to_path_buf(),
            exports,
        })
    }

    /// Load `path` in a throwaway state and read its static facts.
    pub fn inspect(path: &Path) -> Result<ScriptInfo> {
        let module = Self::load(path)?;
        Ok(ScriptInfo {
            path: path.to_path_buf(),
            description: module.description(),
            variables: module.variables(),
            entry_point: module.resolve().ok().map(|script| script.main.0),
        })
    }

    /// The state the module was evaluated in.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `description` export, if it is a string.
    pub fn description(&self) -> Option<String> {
        match self.export("description") {
            LuaValue::String(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        }
    }

    /// The `variables` export, normalized. Malformed entries are skipped.
    pub fn variables(&self) -> Vec<VariableDefinition> {
        let LuaValue::Table(list) = self.export("variables") else {
            return Vec::new();
        };

        list.sequence_values::<LuaValue>()
            .filter_map(|entry| match entry.and_then(parse_declaration) {
                Ok(Some(declaration)) => Some(declaration.normalize()),
                Ok(None) => {
                    log::warn!("Ignoring malformed variable in {}", self.path.display());
                    None
                }
                Err(e) => {
                    log::warn!("Ignoring variable in {}: {}", self.path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Pick out the lifecycle functions.
    ///
    /// `default` is used as the main phase whenever it is a function, even
    /// if `execute` is also exported.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::MissingEntryPoint`] if neither is a function.
    pub fn resolve(&self) -> Result<ResolvedScript> {
        let main = match (self.function("default"), self.function("execute")) {
            (Some(f), _) => (EntryPoint::Default, f),
            (None, Some(f)) => (EntryPoint::Execute, f),
            (None, None) => {
                return Err(ScriptError::MissingEntryPoint {
                    path: self.path.clone(),
                })
            }
        };

        Ok(ResolvedScript {
            tear_up: self.function("tearUp"),
            main,
            tear_down: self.function("tearDown"),
        })
    }

    fn export(&self, key: &str) -> LuaValue {
        self.exports
            .as_ref()
            .and_then(|table| table.get::<LuaValue>(key).ok())
            .unwrap_or(LuaValue::Nil)
    }

    fn function(&self, key: &str) -> Option<LuaFunction> {
        match self.export(key) {
            LuaValue::Function(f) => Some(f),
            _ => None,
        }
    }
}

fn parse_declaration(value: LuaValue) -> LuaResult<Option<VariableDeclaration>> {
    match value {
        LuaValue::String(name) => Ok(Some(VariableDeclaration::Name(
            name.to_string_lossy().to_string(),
        ))),
        LuaValue::Table(record) => {
            let Some(name) = record.get::<Option<String>>("name")? else {
                return Ok(None);
            };
            Ok(Some(VariableDeclaration::Full {
                name,
                message: record.get::<Option<String>>("message")?,
                kind: record.get::<Option<String>>("type")?,
            }))
        }
        _ => Ok(None),
    }
}

/// Let scripts `require` modules that sit next to them.
fn prepend_package_path(lua: &Lua, dir: &Path) -> LuaResult<()> {
    let package: LuaTable = lua.globals().get("package")?;
    let current: String = package.get("path")?;
    let dir = dir.display();
    package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{current}"))
}
