use tauri::{
    webview::NewWindowResponse, AppHandle, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use url::Url;

use crate::{
    append_desktop_log, external_url, origin_policy, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_MIN_HEIGHT, MAIN_WINDOW_MIN_WIDTH, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
    STARTUP_PAGE,
};

/// Builds the hidden main window on the bundled startup page. Remote content
/// loaded later gets the bridge script and nothing else: no global Tauri
/// object, no commands, no capability for its origin.
pub fn build_main_window(
    app_handle: &AppHandle,
    bridge_script: Option<&str>,
) -> Result<WebviewWindow, String> {
    let mut builder = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App(STARTUP_PAGE.into()),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
    .min_inner_size(MAIN_WINDOW_MIN_WIDTH, MAIN_WINDOW_MIN_HEIGHT)
    .visible(false)
    .on_new_window(|url, _features| {
        external_url::handle_new_window_request(
            url.as_str(),
            external_url::open_in_system_browser,
            append_desktop_log,
        );
        NewWindowResponse::Deny
    });

    if let Some(script) = bridge_script {
        builder = builder.initialization_script(script);
    }

    let window = builder
        .icon(tauri::include_image!("./icons/icon.png"))
        .map_err(|error| format!("Failed to set main window icon: {error}"))?
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))?;

    if let Err(error) = origin_policy::install_certificate_error_hook(&window) {
        append_desktop_log(&error);
    }
    Ok(window)
}

pub fn reveal_backend<F>(app_handle: &AppHandle, backend_url: &Url, open_devtools: bool, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("reveal_backend skipped: main window not found");
        return;
    };

    if let Err(error) = window.navigate(backend_url.clone()) {
        log(&format!(
            "failed to navigate main window to {backend_url}: {error}"
        ));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if open_devtools {
        window.open_devtools();
        log("opened devtools for main window");
    }
}

pub fn focus_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("focus_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}
