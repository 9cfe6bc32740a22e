use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_startup_log, backend_launch, desktop_bridge::DesktopBridge,
    launch_plan,
    lifecycle::{SessionPlan, Teardown},
    main_window, startup_task, LauncherState,
};

fn bridge_script(app_handle: &AppHandle) -> Option<String> {
    let launcher_version = app_handle.package_info().version.to_string();
    match DesktopBridge::for_current_host(&launcher_version).initialization_script() {
        Ok(script) => Some(script),
        Err(error) => {
            append_startup_log(&format!("desktop bridge disabled: {error}"));
            None
        }
    }
}

fn spawn_backend_for_session(app_handle: &AppHandle, generation: u64) {
    let resource_dir = app_handle.path().resource_dir().ok();
    let plan = launch_plan::resolve_launch_plan(resource_dir);

    match backend_launch::spawn_backend(&plan, append_startup_log) {
        Ok(child) => {
            let state = app_handle.state::<LauncherState>();
            if let Teardown::Terminated { pid } = state.lifecycle().attach_backend(child) {
                append_startup_log(&format!(
                    "session {generation} replaced a still-running backend (pid {pid})"
                ));
            };
        }
        Err(error) => {
            append_startup_log(&format!("failed to start backend: {error}"));
        }
    }
}

/// Opens the main window and starts (or reuses) the backend. Called on app
/// ready and whenever the app is reactivated without a window.
pub(crate) fn start_session(app_handle: &AppHandle) {
    let state = app_handle.state::<LauncherState>();
    let plan = state.lifecycle().begin_session();

    let (generation, spawn_backend) = match plan {
        SessionPlan::AlreadyOpen { generation } => {
            append_desktop_log(&format!(
                "session {generation} already has a main window; focusing it"
            ));
            main_window::focus_main_window(app_handle, append_desktop_log);
            return;
        }
        SessionPlan::Create {
            generation,
            spawn_backend,
        } => (generation, spawn_backend),
    };

    append_startup_log(&format!("starting session {generation}"));
    let script = bridge_script(app_handle);
    if let Err(error) = main_window::build_main_window(app_handle, script.as_deref()) {
        append_startup_log(&error);
        state.lifecycle().abandon_session(generation);
        return;
    }

    if spawn_backend {
        spawn_backend_for_session(app_handle, generation);
    } else {
        let pid = state.lifecycle().backend_pid();
        append_startup_log(&format!(
            "session {generation} reuses running backend (pid {})",
            pid.map(|pid| pid.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ));
    }

    startup_task::spawn_startup_task(app_handle.clone(), generation, append_startup_log);
}
