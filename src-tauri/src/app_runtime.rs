use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    app_helpers::desktop_log_location, app_session, append_desktop_log, append_startup_log,
    backend_config, exit_events, startup_mode::StartupMode, LauncherState, BACKEND_PORT,
    MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    let startup_mode = StartupMode::from_env();

    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        desktop_log_location().display()
    ));
    append_startup_log(&format!("startup mode: {}", startup_mode.label()));

    let backend_url = match backend_config::backend_url(BACKEND_PORT) {
        Ok(url) => url,
        Err(error) => {
            append_startup_log(&format!("cannot start: {error}"));
            return;
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            exit_events::handle_second_instance(app);
        }))
        .manage(LauncherState::new(backend_url, startup_mode))
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::Destroyed = event {
                exit_events::handle_window_destroyed(window.app_handle());
            }
        })
        .on_page_load(|_webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
            }
        })
        .setup(|app| {
            app_session::start_session(app.handle());
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows,
                ..
            } => {
                exit_events::handle_reopen(app_handle, has_visible_windows);
            }
            _ => {}
        });
}
