use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    app_session, append_desktop_log, append_shutdown_log,
    lifecycle::{AllWindowsClosedDecision, HostPlatform, Teardown},
    main_window, ui_dispatch, LauncherState,
};

fn log_teardown(trigger: &str, teardown: Teardown) {
    match teardown {
        Teardown::Terminated { pid } => {
            append_shutdown_log(&format!("{trigger}: stopped backend (pid {pid})"));
        }
        Teardown::NothingToStop => {
            append_shutdown_log(&format!("{trigger}: no backend to stop"));
        }
    }
}

pub(crate) fn handle_window_destroyed(app_handle: &AppHandle) {
    let state = app_handle.state::<LauncherState>();
    let destroyed = state.lifecycle().window_destroyed();
    if let Some(session) = destroyed {
        append_desktop_log(&format!(
            "main window of session {} destroyed",
            session.generation
        ));
    }
}

/// `code` is `None` when the last window closed and `Some` for an explicit
/// `exit` request.
pub(crate) fn handle_exit_requested(
    app_handle: &AppHandle,
    code: Option<i32>,
    api: &ExitRequestApi,
) {
    let state = app_handle.state::<LauncherState>();
    match code {
        None => {
            let (teardown, decision) = state
                .lifecycle()
                .all_windows_closed(HostPlatform::current());
            log_teardown("all windows closed", teardown);
            match decision {
                AllWindowsClosedDecision::StayResident => {
                    api.prevent_exit();
                    append_shutdown_log("staying resident with zero windows until reopen or quit");
                }
                AllWindowsClosedDecision::ExitApp => {
                    append_shutdown_log("exiting after last window closed");
                }
            }
        }
        Some(code) => {
            let teardown = state.lifecycle().before_quit();
            log_teardown(&format!("quit requested (code {code})"), teardown);
        }
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle.state::<LauncherState>();
    let teardown = state.lifecycle().before_quit();
    log_teardown("process exit", teardown);
}

pub(crate) fn handle_reopen(app_handle: &AppHandle, has_visible_windows: bool) {
    let state = app_handle.state::<LauncherState>();
    let recreate = state.lifecycle().should_recreate_on_reopen();
    if recreate {
        append_desktop_log("reactivated without a window; starting a new session");
        app_session::start_session(app_handle);
    } else if !has_visible_windows {
        main_window::focus_main_window(app_handle, append_desktop_log);
    }
}

pub(crate) fn handle_second_instance(app_handle: &AppHandle) {
    append_desktop_log("second instance launch redirected to the running app");
    if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
        app_handle,
        "reactivate after second instance",
        |main_app| handle_reopen(main_app, false),
    ) {
        append_desktop_log(&error);
    }
}
