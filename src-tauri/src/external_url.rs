#[cfg(not(target_os = "windows"))]
use std::process::Command;
use std::process::Stdio;

use url::Url;

#[cfg(target_os = "windows")]
use crate::process_control::background_command;

pub fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

/// Hands a content-initiated new-window request to `open` when the URL is
/// http(s) and logs everything else. The caller always denies the embedded
/// window itself.
pub fn handle_new_window_request<O, F>(url: &str, open: O, log: F)
where
    O: FnOnce(&Url) -> Result<(), String>,
    F: Fn(&str),
{
    match parse_openable_url(url) {
        Ok(parsed) => match open(&parsed) {
            Ok(()) => log(&format!("opened external url in system browser: {parsed}")),
            Err(error) => log(&format!("failed to open external url {parsed}: {error}")),
        },
        Err(error) => log(&format!("ignored new-window request for {url:?}: {error}")),
    }
}

pub fn open_in_system_browser(url: &Url) -> Result<(), String> {
    open_url_with_system_browser(url.as_str())
}

#[cfg(target_os = "macos")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    background_command("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn open_url_with_system_browser(_url: &str) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}
