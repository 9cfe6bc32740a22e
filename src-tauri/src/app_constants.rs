use std::time::Duration;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "File Compare";
pub const MAIN_WINDOW_WIDTH: f64 = 1400.0;
pub const MAIN_WINDOW_HEIGHT: f64 = 900.0;
pub const MAIN_WINDOW_MIN_WIDTH: f64 = 1000.0;
pub const MAIN_WINDOW_MIN_HEIGHT: f64 = 700.0;
pub const STARTUP_PAGE: &str = "index.html";

pub const BACKEND_PORT: u16 = 8501;
pub const BACKEND_PORT_ENV: &str = "STREAMLIT_SERVER_PORT";
pub const BACKEND_ENTRY_SCRIPT: &str = "app.py";
pub const BACKEND_MODULE: &str = "streamlit";

pub const STARTUP_NAVIGATION_DELAY: Duration = Duration::from_secs(3);
pub const READINESS_INITIAL_BACKOFF: Duration = Duration::from_millis(200);
pub const READINESS_MAX_BACKOFF: Duration = Duration::from_secs(2);
pub const READINESS_MAX_WAIT: Duration = Duration::from_secs(30);
pub const READINESS_PROBE_TIMEOUT: Duration = Duration::from_millis(800);

pub const DEV_MODE_FLAG: &str = "--dev";
pub const DESKTOP_BRIDGE_GLOBAL: &str = "desktopAPI";

pub const DESKTOP_ROOT_ENV: &str = "FILE_COMPARE_DESKTOP_ROOT";
pub const APP_DIR_ENV: &str = "FILE_COMPARE_APP_DIR";
pub const DESKTOP_ROOT_DIR_NAME: &str = ".file-compare-desktop";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const BACKEND_LOG_FILE: &str = "backend.log";
pub const LOG_ROTATE_MAX_BYTES: u64 = 5 * 1024 * 1024;
