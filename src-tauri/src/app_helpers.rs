use std::{path::PathBuf, sync::OnceLock};

use crate::{
    backend_output::OutputStream, logging, runtime_paths, BACKEND_LOG_FILE, DESKTOP_LOG_FILE,
    LOG_ROTATE_MAX_BYTES,
};

fn desktop_log_path() -> &'static PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        logging::resolve_desktop_log_path(
            runtime_paths::default_packaged_root_dir(),
            DESKTOP_LOG_FILE,
        )
    })
}

fn backend_log_path() -> &'static PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        logging::resolve_desktop_log_path(
            runtime_paths::default_packaged_root_dir(),
            BACKEND_LOG_FILE,
        )
    })
}

fn append_scoped_desktop_log(scope: &str, message: &str) {
    let _ = logging::append_log_line(desktop_log_path(), scope, message, LOG_ROTATE_MAX_BYTES);
}

pub fn desktop_log_location() -> PathBuf {
    desktop_log_path().clone()
}

pub fn append_desktop_log(message: &str) {
    append_scoped_desktop_log("desktop", message);
}

pub fn append_startup_log(message: &str) {
    append_scoped_desktop_log("startup", message);
}

pub fn append_shutdown_log(message: &str) {
    append_scoped_desktop_log("shutdown", message);
}

pub fn append_backend_log(stream: OutputStream, line: &str) {
    let _ = logging::append_log_line(
        backend_log_path(),
        "backend",
        &format!("[{}] {}", stream.label(), line),
        LOG_ROTATE_MAX_BYTES,
    );
}
