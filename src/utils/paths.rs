//! Path utilities.

use std::path::{Path, PathBuf};

use crate::discovery::SCRIPT_EXTENSIONS;
use crate::error::{Result, ScriptError};

/// Change the process working directory.
///
/// This is process-wide state: call it once at startup, before any script
/// runs.
///
/// # Errors
///
/// Returns [`ScriptError::WorkingDirectoryNotFound`] if `dir` is not an
/// existing directory.
pub fn change_working_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(ScriptError::WorkingDirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    std::env::set_current_dir(dir).map_err(|e| ScriptError::io("change directory to", dir, e))?;
    log::debug!("Working directory set to {}", dir.display());
    Ok(())
}

/// Find the script file `name` refers to.
///
/// `name` is tried as given (absolute, or relative to `cwd`), then relative
/// to `scripts_dir`. In each place the bare name is tried before the name
/// with a script extension appended.
pub fn find_script_file(name: &str, cwd: &Path, scripts_dir: &Path) -> Option<PathBuf> {
    let given = Path::new(name);
    let bases: Vec<PathBuf> = if given.is_absolute() {
        vec![given.to_path_buf()]
    } else {
        vec![cwd.join(given), scripts_dir.join(given)]
    };

    bases.into_iter().find_map(|base| {
        std::iter::once(base.clone())
            .chain(
                SCRIPT_EXTENSIONS
                    .iter()
                    .map(|ext| PathBuf::from(format!("{}.{}", base.display(), ext))),
            )
            .find(|candidate| candidate.is_file())
    })
}
