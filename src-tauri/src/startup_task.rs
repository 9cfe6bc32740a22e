use std::{thread, time::Instant};

use tauri::{AppHandle, Manager};
use url::Url;

use crate::{
    backend_readiness::{self, BackoffPolicy, ProbeOutcome, ReadinessError},
    main_window,
    startup_mode::StartupMode,
    ui_dispatch, LauncherState, STARTUP_NAVIGATION_DELAY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationStep {
    SkipStaleSession,
    Reveal { open_devtools: bool },
}

pub(crate) fn decide_navigation(session_is_current: bool, mode: StartupMode) -> NavigationStep {
    if !session_is_current {
        return NavigationStep::SkipStaleSession;
    }
    NavigationStep::Reveal {
        open_devtools: mode.open_devtools,
    }
}

fn session_is_current(app_handle: &AppHandle, generation: u64) -> bool {
    app_handle
        .state::<LauncherState>()
        .lifecycle()
        .is_current_session(generation)
}

fn probe_backend(app_handle: &AppHandle, addrs: &[std::net::SocketAddr]) -> ProbeOutcome {
    if backend_readiness::ping_backend(addrs) {
        return ProbeOutcome::Ready;
    }

    let state = app_handle.state::<LauncherState>();
    let mut lifecycle = state.lifecycle();
    if lifecycle.backend_alive() {
        ProbeOutcome::NotReady
    } else {
        ProbeOutcome::Exited("backend process is not running".to_string())
    }
}

fn wait_until_backend_ready(app_handle: &AppHandle, backend_url: &Url) -> Result<u32, ReadinessError> {
    let addrs = backend_readiness::backend_socket_addrs(backend_url)?;
    backend_readiness::wait_for_backend(
        backend_url.as_str(),
        BackoffPolicy::default(),
        || probe_backend(app_handle, &addrs),
        thread::sleep,
    )
}

pub(crate) fn navigate_main_window_to_backend<F>(app_handle: &AppHandle, generation: u64, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<LauncherState>();
    let is_current = state.lifecycle().is_current_session(generation);
    match decide_navigation(is_current, state.startup_mode) {
        NavigationStep::SkipStaleSession => log(&format!(
            "skipping navigation for session {generation}: its window is gone"
        )),
        NavigationStep::Reveal { open_devtools } => {
            log(&format!("navigating main window to {}", state.backend_url));
            main_window::reveal_backend(app_handle, &state.backend_url, open_devtools, log);
        }
    }
}

/// Waits the fixed startup delay, then probes the backend with bounded
/// backoff, then navigates the window of session `generation`. Runs off the
/// main thread so window events keep flowing meanwhile.
pub(crate) fn spawn_startup_task<F>(app_handle: AppHandle, generation: u64, log: F)
where
    F: Fn(&str) + Copy + Send + 'static,
{
    tauri::async_runtime::spawn_blocking(move || {
        thread::sleep(STARTUP_NAVIGATION_DELAY);

        if !session_is_current(&app_handle, generation) {
            log(&format!(
                "startup task for session {generation} abandoned: window closed during delay"
            ));
            return;
        }

        let backend_url = app_handle.state::<LauncherState>().backend_url.clone();
        let started = Instant::now();
        match wait_until_backend_ready(&app_handle, &backend_url) {
            Ok(attempts) => log(&format!(
                "backend reachable at {backend_url} after {attempts} probe(s), {}ms past the startup delay",
                started.elapsed().as_millis()
            )),
            Err(error) => log(&format!("{error}; loading {backend_url} anyway")),
        }

        if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
            &app_handle,
            "navigate main window to backend",
            move |main_app| navigate_main_window_to_backend(main_app, generation, log),
        ) {
            log(&error);
        }
    });
}
