use std::path::{Path, PathBuf};

use url::Url;

use crate::{append_startup_log, runtime_paths, APP_DIR_ENV, BACKEND_ENTRY_SCRIPT};

pub fn backend_url(port: u16) -> Result<Url, String> {
    let raw = format!("http://localhost:{port}/");
    Url::parse(&raw).map_err(|error| format!("Invalid backend url {raw}: {error}"))
}

pub fn app_dir_candidates(
    resource_dir: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    workspace_root: PathBuf,
) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = resource_dir.into_iter().collect();
    if let Some(dir) = exe_dir {
        let parent = dir.parent().map(Path::to_path_buf);
        candidates.push(dir);
        candidates.extend(parent);
    }
    candidates.push(workspace_root);
    candidates
}

pub fn pick_app_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| has_entry_script(dir))
        .cloned()
}

fn has_entry_script(dir: &Path) -> bool {
    dir.join(BACKEND_ENTRY_SCRIPT).is_file()
}

/// Directory the backend is started in. An explicit override always wins,
/// even when it does not contain the entry script.
pub fn resolve_app_dir(resource_dir: Option<PathBuf>) -> PathBuf {
    let override_dir = runtime_paths::non_empty_env_path(APP_DIR_ENV);
    if let Some(dir) = &override_dir {
        if !has_entry_script(dir) {
            append_startup_log(&format!(
                "{} points to {} which has no {}",
                APP_DIR_ENV,
                dir.display(),
                BACKEND_ENTRY_SCRIPT
            ));
        }
        return dir.clone();
    }

    let workspace_root = runtime_paths::workspace_root_dir();
    let candidates = app_dir_candidates(
        resource_dir,
        runtime_paths::current_exe_dir(),
        workspace_root.clone(),
    );
    match pick_app_dir(&candidates) {
        Some(dir) => dir,
        None => {
            append_startup_log(&format!(
                "{} not found in any candidate directory; falling back to {}",
                BACKEND_ENTRY_SCRIPT,
                workspace_root.display()
            ));
            workspace_root
        }
    }
}
