use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{DESKTOP_ROOT_DIR_NAME, DESKTOP_ROOT_ENV};

pub fn default_packaged_root_dir() -> Option<PathBuf> {
    if let Some(root) = non_empty_env_path(DESKTOP_ROOT_ENV) {
        return Some(root);
    }

    home::home_dir().map(|home| home.join(DESKTOP_ROOT_DIR_NAME))
}

pub(crate) fn non_empty_env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate
        .canonicalize()
        .unwrap_or_else(|_| candidate.to_path_buf())
}

pub fn current_exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
