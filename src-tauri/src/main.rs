#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_session;
mod app_types;
mod backend_config;
mod backend_launch;
mod backend_output;
mod backend_readiness;
mod desktop_bridge;
mod exit_events;
mod external_url;
mod launch_plan;
mod lifecycle;
mod logging;
mod main_window;
mod origin_policy;
mod process_control;
mod runtime_paths;
mod startup_mode;
mod startup_task;
mod ui_dispatch;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{append_desktop_log, append_shutdown_log, append_startup_log};
pub(crate) use app_types::{LaunchPlan, LauncherState};

fn main() {
    app_runtime::run();
}
