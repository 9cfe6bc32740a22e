use std::{ffi::OsStr, process::Child, process::Command};
#[cfg(target_os = "windows")]
use std::process::Stdio;

use crate::lifecycle::ManagedChild;

/// A `Command` that never opens a console window. Release builds run without
/// a console, so Windows would otherwise give every console child its own.
pub fn background_command<S: AsRef<OsStr>>(program: S) -> Command {
    #[allow(unused_mut)]
    let mut command = Command::new(program);

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    command
}

/// Kills the backend (and its process tree on Windows) and reaps it.
pub fn stop_child_process(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        let _ = background_command("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .status();
        let _ = child.wait();
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl ManagedChild for Child {
    fn pid(&self) -> u32 {
        self.id()
    }

    fn has_exited(&mut self) -> bool {
        // An unreadable status is treated as still running so teardown still kills it.
        matches!(self.try_wait(), Ok(Some(_)))
    }

    fn terminate(&mut self) {
        stop_child_process(self);
    }
}
