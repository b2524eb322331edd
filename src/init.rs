//! Project scaffolding for `scriptrun init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{
    generate_example_config, CONFIG_FILE_NAME, DEFAULT_ENV_FILE, DEFAULT_SCRIPTS_DIR,
    DEFAULT_TMP_DIR,
};

/// Example script written into the new scripts directory.
pub const EXAMPLE_SCRIPT: &str = r#"-- Example scriptrun script.
--
-- Run it with:  scriptrun exec example.lua --param name=world
-- Prompted variables already set in the environment are not asked for.

return {
  description = "Greet someone and show the script lifecycle",

  variables = {
    { name = "GREETING", message = "Which greeting should be used?" },
  },

  -- Runs first. Its return value is passed to execute and tearDown.
  tearUp = function(ctx)
    ctx.log("Preparing in", ctx.tmpDir)
    return { startedAt = tostring(ctx.now()) }
  end,

  execute = function(ctx, setup)
    local greeting = ctx.env.GREETING or "Hello"
    local name = ctx.params.name or "there"
    if ctx.console then
      ctx.console.info(greeting .. ", " .. name .. "!")
    end
    return { message = greeting .. ", " .. name, startedAt = setup.startedAt }
  end,

  -- Runs last, even with a result from execute. Errors here fail the run.
  tearDown = function(ctx, result, setup)
    ctx.log("Done:", result.message)
  end,
}
"#;

/// Outcome of [`init_project`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Scaffold a project in `base_dir`.
///
/// Existing files are left untouched unless `force` is set.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn init_project(base_dir: &Path, force: bool) -> Result<InitReport> {
    let mut report = InitReport::default();

    let scripts_dir = base_dir.join(DEFAULT_SCRIPTS_DIR);
    let tmp_dir = base_dir.join(DEFAULT_TMP_DIR);
    for dir in [&scripts_dir, &tmp_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let files = [
        (base_dir.join(CONFIG_FILE_NAME), generate_example_config()),
        (scripts_dir.join("example.lua"), EXAMPLE_SCRIPT.to_string()),
        (base_dir.join(DEFAULT_ENV_FILE), String::new()),
    ];

    for (path, content) in files {
        if path.exists() && !force {
            log::debug!("Keeping existing {}", path.display());
            report.skipped.push(path);
            continue;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        report.created.push(path);
    }

    Ok(report)
}
