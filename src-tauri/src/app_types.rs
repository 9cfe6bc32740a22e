use std::{
    path::PathBuf,
    process::Child,
    sync::{Mutex, MutexGuard, PoisonError},
};

use url::Url;

use crate::{append_desktop_log, lifecycle::Lifecycle, startup_mode::StartupMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) env: Vec<(String, String)>,
}

#[derive(Debug)]
pub(crate) struct LauncherState {
    lifecycle: Mutex<Lifecycle<Child>>,
    pub(crate) backend_url: Url,
    pub(crate) startup_mode: StartupMode,
}

impl LauncherState {
    pub(crate) fn new(backend_url: Url, startup_mode: StartupMode) -> Self {
        Self {
            lifecycle: Mutex::new(Lifecycle::default()),
            backend_url,
            startup_mode,
        }
    }

    /// Teardown must still reach the child after a panic elsewhere, so a
    /// poisoned lock is recovered rather than skipped.
    pub(crate) fn lifecycle(&self) -> MutexGuard<'_, Lifecycle<Child>> {
        self.lifecycle.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            append_desktop_log("lifecycle lock was poisoned; recovering state");
            poisoned.into_inner()
        })
    }
}
