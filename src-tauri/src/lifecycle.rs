//! Window/backend lifecycle state.
//!
//! The launcher owns at most one main window session and at most one backend
//! child. Every Tauri hook maps to one transition here so the coupling between
//! the two can be tested without a webview.

/// The handful of operations teardown needs from a child process.
pub trait ManagedChild {
    fn pid(&self) -> u32;
    fn has_exited(&mut self) -> bool;
    fn terminate(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Other,
}

impl HostPlatform {
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::MacOs,
            _ => HostPlatform::Other,
        }
    }

    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// macOS keeps apps alive in the dock after their last window closes.
    pub fn stays_resident_without_windows(self) -> bool {
        self == HostPlatform::MacOs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSession {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPlan {
    AlreadyOpen { generation: u64 },
    Create { generation: u64, spawn_backend: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllWindowsClosedDecision {
    ExitApp,
    StayResident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Terminated { pid: u32 },
    NothingToStop,
}

#[derive(Debug)]
pub struct Lifecycle<C> {
    window: Option<WindowSession>,
    backend: Option<C>,
    last_generation: u64,
}

impl<C> Default for Lifecycle<C> {
    fn default() -> Self {
        Self {
            window: None,
            backend: None,
            last_generation: 0,
        }
    }
}

impl<C: ManagedChild> Lifecycle<C> {
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn backend_pid(&self) -> Option<u32> {
        self.backend.as_ref().map(ManagedChild::pid)
    }

    /// Drops a backend handle whose process already exited and reports
    /// whether a live one remains.
    pub fn backend_alive(&mut self) -> bool {
        let exited = match self.backend.as_mut() {
            Some(child) => child.has_exited(),
            None => return false,
        };
        if exited {
            self.backend = None;
        }
        !exited
    }

    /// Opens a new window session unless one is already live. A live backend
    /// left over from an earlier session is reused instead of spawning a second
    /// server on the same port.
    pub fn begin_session(&mut self) -> SessionPlan {
        if let Some(session) = self.window {
            return SessionPlan::AlreadyOpen {
                generation: session.generation,
            };
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        self.window = Some(WindowSession { generation });
        SessionPlan::Create {
            generation,
            spawn_backend: !self.backend_alive(),
        }
    }

    /// Rolls back a session whose window could not be built.
    pub fn abandon_session(&mut self, generation: u64) {
        if self.is_current_session(generation) {
            self.window = None;
        }
    }

    /// Stores a freshly spawned backend. A still-running previous handle is
    /// terminated first so the single-backend invariant holds.
    pub fn attach_backend(&mut self, child: C) -> Teardown {
        let replaced = self.stop_backend();
        self.backend = Some(child);
        replaced
    }

    pub fn is_current_session(&self, generation: u64) -> bool {
        self.window
            .map(|session| session.generation == generation)
            .unwrap_or(false)
    }

    pub fn window_destroyed(&mut self) -> Option<WindowSession> {
        self.window.take()
    }

    pub fn all_windows_closed(
        &mut self,
        platform: HostPlatform,
    ) -> (Teardown, AllWindowsClosedDecision) {
        let teardown = self.stop_backend();
        let decision = if platform.stays_resident_without_windows() {
            AllWindowsClosedDecision::StayResident
        } else {
            AllWindowsClosedDecision::ExitApp
        };
        (teardown, decision)
    }

    pub fn before_quit(&mut self) -> Teardown {
        self.stop_backend()
    }

    /// Whether a reactivation should start a new session.
    pub fn should_recreate_on_reopen(&self) -> bool {
        !self.has_window()
    }

    fn stop_backend(&mut self) -> Teardown {
        match self.backend.take() {
            Some(mut child) => {
                let pid = child.pid();
                child.terminate();
                Teardown::Terminated { pid }
            }
            None => Teardown::NothingToStop,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeChild {
        pid: u32,
        exited: Rc<Cell<bool>>,
        terminations: Rc<Cell<u32>>,
    }

    impl FakeChild {
        fn new(pid: u32) -> Self {
            Self {
                pid,
                exited: Rc::new(Cell::new(false)),
                terminations: Rc::new(Cell::new(0)),
            }
        }
    }

    impl ManagedChild for FakeChild {
        fn pid(&self) -> u32 {
            self.pid
        }

        fn has_exited(&mut self) -> bool {
            self.exited.get()
        }

        fn terminate(&mut self) {
            self.terminations.set(self.terminations.get() + 1);
            self.exited.set(true);
        }
    }

    fn started(child: &FakeChild) -> Lifecycle<FakeChild> {
        let mut lifecycle = Lifecycle::default();
        assert_eq!(
            lifecycle.begin_session(),
            SessionPlan::Create {
                generation: 1,
                spawn_backend: true
            }
        );
        lifecycle.attach_backend(child.clone());
        lifecycle
    }

    #[test]
    fn host_platform_maps_rust_os_names() {
        assert_eq!(HostPlatform::from_os("windows"), HostPlatform::Windows);
        assert_eq!(HostPlatform::from_os("macos"), HostPlatform::MacOs);
        assert_eq!(HostPlatform::from_os("linux"), HostPlatform::Other);
    }

    #[test]
    fn begin_session_is_idempotent_while_window_is_open() {
        let child = FakeChild::new(10);
        let mut lifecycle = started(&child);
        assert_eq!(
            lifecycle.begin_session(),
            SessionPlan::AlreadyOpen { generation: 1 }
        );
    }

    #[test]
    fn destroyed_window_invalidates_pending_navigation() {
        let child = FakeChild::new(10);
        let mut lifecycle = started(&child);
        assert!(lifecycle.is_current_session(1));

        assert_eq!(
            lifecycle.window_destroyed(),
            Some(WindowSession { generation: 1 })
        );
        assert!(!lifecycle.is_current_session(1));
        assert!(!lifecycle.has_window());
    }

    #[test]
    fn stale_navigation_does_not_target_a_newer_window() {
        let child = FakeChild::new(10);
        let mut lifecycle = started(&child);
        lifecycle.window_destroyed();
        lifecycle.begin_session();

        assert!(!lifecycle.is_current_session(1));
        assert!(lifecycle.is_current_session(2));
    }

    #[test]
    fn all_windows_closed_exits_everywhere_but_macos() {
        for platform in [HostPlatform::Windows, HostPlatform::Other] {
            let child = FakeChild::new(10);
            let mut lifecycle = started(&child);
            lifecycle.window_destroyed();
            let (teardown, decision) = lifecycle.all_windows_closed(platform);
            assert_eq!(teardown, Teardown::Terminated { pid: 10 });
            assert_eq!(decision, AllWindowsClosedDecision::ExitApp);
            assert_eq!(child.terminations.get(), 1);
        }
    }

    #[test]
    fn all_windows_closed_stays_resident_on_macos_with_zero_windows() {
        let child = FakeChild::new(10);
        let mut lifecycle = started(&child);
        lifecycle.window_destroyed();

        let (_, decision) = lifecycle.all_windows_closed(HostPlatform::MacOs);
        assert_eq!(decision, AllWindowsClosedDecision::StayResident);
        assert!(!lifecycle.has_window());
        assert!(lifecycle.should_recreate_on_reopen());
        assert_eq!(lifecycle.backend_pid(), None);
    }

    #[test]
    fn before_quit_terminates_backend_exactly_once() {
        let child = FakeChild::new(42);
        let mut lifecycle = started(&child);

        assert_eq!(lifecycle.before_quit(), Teardown::Terminated { pid: 42 });
        assert_eq!(lifecycle.before_quit(), Teardown::NothingToStop);
        let (teardown, _) = lifecycle.all_windows_closed(HostPlatform::Other);
        assert_eq!(teardown, Teardown::NothingToStop);
        assert_eq!(child.terminations.get(), 1);
    }

    #[test]
    fn before_quit_without_backend_is_a_no_op() {
        let mut lifecycle: Lifecycle<FakeChild> = Lifecycle::default();
        assert_eq!(lifecycle.before_quit(), Teardown::NothingToStop);
    }

    #[test]
    fn reopen_reuses_live_backend() {
        let child = FakeChild::new(7);
        let mut lifecycle = started(&child);
        lifecycle.window_destroyed();

        assert!(lifecycle.should_recreate_on_reopen());
        assert_eq!(
            lifecycle.begin_session(),
            SessionPlan::Create {
                generation: 2,
                spawn_backend: false
            }
        );
        assert_eq!(lifecycle.backend_pid(), Some(7));
        assert_eq!(child.terminations.get(), 0);
    }

    #[test]
    fn reopen_respawns_when_backend_died_on_its_own() {
        let child = FakeChild::new(7);
        let mut lifecycle = started(&child);
        lifecycle.window_destroyed();
        child.exited.set(true);

        assert_eq!(
            lifecycle.begin_session(),
            SessionPlan::Create {
                generation: 2,
                spawn_backend: true
            }
        );
        assert_eq!(lifecycle.backend_pid(), None);
        assert_eq!(child.terminations.get(), 0);
    }

    #[test]
    fn attach_backend_stops_a_previous_live_handle() {
        let first = FakeChild::new(1);
        let second = FakeChild::new(2);
        let mut lifecycle = started(&first);

        assert_eq!(
            lifecycle.attach_backend(second.clone()),
            Teardown::Terminated { pid: 1 }
        );
        assert_eq!(first.terminations.get(), 1);
        assert_eq!(lifecycle.backend_pid(), Some(2));
    }

    #[test]
    fn abandon_session_only_clears_matching_generation() {
        let mut lifecycle: Lifecycle<FakeChild> = Lifecycle::default();
        lifecycle.begin_session();
        lifecycle.abandon_session(99);
        assert!(lifecycle.has_window());
        lifecycle.abandon_session(1);
        assert!(!lifecycle.has_window());
    }
}
