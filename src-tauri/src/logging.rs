use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;

pub fn resolve_desktop_log_path(packaged_root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    packaged_root_dir
        .unwrap_or_else(|| env::temp_dir().join(crate::DESKTOP_ROOT_DIR_NAME))
        .join("logs")
        .join(file_name)
}

pub fn format_log_line(scope: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        scope,
        message.trim_end()
    )
}

fn rotated_log_path(log_path: &Path) -> PathBuf {
    let mut rotated = log_path.as_os_str().to_owned();
    rotated.push(".1");
    PathBuf::from(rotated)
}

/// Moves `log_path` aside to `<name>.1` once it has grown past `max_bytes`.
/// A previous rotation is replaced.
pub fn rotate_log_if_needed(log_path: &Path, max_bytes: u64) -> Result<bool, String> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => {
            return Err(format!(
                "Failed to stat log file {}: {}",
                log_path.display(),
                error
            ));
        }
    };
    if size < max_bytes {
        return Ok(false);
    }

    let rotated = rotated_log_path(log_path);
    if rotated.exists() {
        fs::remove_file(&rotated).map_err(|error| {
            format!(
                "Failed to remove old rotated log {}: {}",
                rotated.display(),
                error
            )
        })?;
    }
    fs::rename(log_path, &rotated).map_err(|error| {
        format!(
            "Failed to rotate log {} to {}: {}",
            log_path.display(),
            rotated.display(),
            error
        )
    })?;
    Ok(true)
}

pub fn append_log_line(
    log_path: &Path,
    scope: &str,
    message: &str,
    max_bytes: u64,
) -> Result<(), String> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    rotate_log_if_needed(log_path, max_bytes)?;

    let line = format_log_line(scope, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open log {}: {}", log_path.display(), error))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("Failed to write log {}: {}", log_path.display(), error))
}
