use std::process::{Child, Command, Stdio};

use crate::{
    app_helpers::append_backend_log,
    backend_output::{self, OutputStream},
    launch_plan::build_debug_command,
    process_control::{background_command, stop_child_process},
    LaunchPlan, BACKEND_ENTRY_SCRIPT,
};

pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut command = background_command(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // Explicit values replace whatever the parent environment carries.
    for (key, value) in &plan.env {
        command.env(key, value);
    }
    command
}

/// Spawns the backend described by `plan` and forwards its output to `sink`.
pub fn spawn_backend_with_sink<F>(plan: &LaunchPlan, sink: F) -> Result<Child, String>
where
    F: Fn(OutputStream, &str) + Clone + Send + 'static,
{
    if !plan.cwd.is_dir() {
        return Err(format!(
            "Backend working directory {} does not exist",
            plan.cwd.display()
        ));
    }

    let mut child = build_command(plan).spawn().map_err(|error| {
        format!(
            "Failed to spawn backend process with command {:?} in {}: {}",
            build_debug_command(plan),
            plan.cwd.display(),
            error
        )
    })?;

    if let Err(error) = attach_output_forwarders(&mut child, sink) {
        stop_child_process(&mut child);
        return Err(error);
    }

    Ok(child)
}

fn attach_output_forwarders<F>(child: &mut Child, sink: F) -> Result<(), String>
where
    F: Fn(OutputStream, &str) + Clone + Send + 'static,
{
    if let Some(stdout) = child.stdout.take() {
        let sink = sink.clone();
        backend_output::spawn_output_forwarder(stdout, OutputStream::Stdout, move |stream, line| {
            sink(stream, line)
        })?;
    }
    if let Some(stderr) = child.stderr.take() {
        backend_output::spawn_output_forwarder(stderr, OutputStream::Stderr, move |stream, line| {
            sink(stream, line)
        })?;
    }
    Ok(())
}

pub fn spawn_backend<F>(plan: &LaunchPlan, log: F) -> Result<Child, String>
where
    F: Fn(&str),
{
    if !plan.cwd.join(BACKEND_ENTRY_SCRIPT).is_file() {
        log(&format!(
            "{} is missing from {}; the backend will likely fail to start",
            BACKEND_ENTRY_SCRIPT,
            plan.cwd.display()
        ));
    }
    log(&format!(
        "spawning backend: {} (cwd={})",
        build_debug_command(plan),
        plan.cwd.display()
    ));
    let child = spawn_backend_with_sink(plan, append_backend_log)?;
    log(&format!("backend spawned with pid {}", child.id()));
    Ok(child)
}

#[cfg(test)]
mod tests {
    use std::{
        ffi::OsStr,
        path::PathBuf,
        sync::{Arc, Mutex},
        time::{Duration, Instant},
    };

    use super::*;
    use crate::launch_plan::build_launch_plan;

    #[test]
    fn build_command_overrides_port_env_regardless_of_parent() {
        let plan = build_launch_plan("linux", PathBuf::from("."));
        let command = build_command(&plan);

        let port = command
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("STREAMLIT_SERVER_PORT"))
            .and_then(|(_, value)| value);
        assert_eq!(port, Some(OsStr::new("8501")));
        assert_eq!(command.get_program(), OsStr::new("python3"));
    }

    #[test]
    fn build_command_keeps_argument_order() {
        let plan = build_launch_plan("windows", PathBuf::from("."));
        let command = build_command(&plan);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            ["-m", "streamlit", "run", "app.py", "--server.headless", "true"]
                .map(OsStr::new)
                .to_vec()
        );
    }

    #[test]
    fn spawn_failure_is_reported_as_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let plan = LaunchPlan {
            cmd: "file-compare-no-such-interpreter".to_string(),
            args: Vec::new(),
            cwd: temp.path().to_path_buf(),
            env: Vec::new(),
        };
        let error = spawn_backend_with_sink(&plan, |_, _| {}).expect_err("spawn must fail");
        assert!(error.contains("file-compare-no-such-interpreter"));
    }

    #[test]
    fn missing_working_directory_fails_without_creating_it() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("mistyped-app-dir");
        let plan = build_launch_plan("linux", missing.clone());

        let error = spawn_backend_with_sink(&plan, |_, _| {}).expect_err("spawn must fail");
        assert!(error.contains("mistyped-app-dir"), "{error}");
        assert!(!missing.exists());
    }

    #[cfg(unix)]
    #[test]
    fn spawned_backend_sees_pinned_port_and_output_is_tagged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let plan = LaunchPlan {
            cmd: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo \"port=$STREAMLIT_SERVER_PORT\"; echo oops >&2".to_string(),
            ],
            cwd: temp.path().to_path_buf(),
            env: vec![("STREAMLIT_SERVER_PORT".to_string(), "8501".to_string())],
        };
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let mut child = spawn_backend_with_sink(&plan, move |stream, line| {
            sink_seen
                .lock()
                .expect("sink lock")
                .push(format!("{}:{}", stream.label(), line));
        })
        .expect("spawn sh");
        child.wait().expect("wait sh");

        let deadline = Instant::now() + Duration::from_secs(5);
        while seen.lock().expect("seen lock").len() < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        let mut lines = seen.lock().expect("seen lock").clone();
        lines.sort();
        assert_eq!(lines, vec!["stderr:oops", "stdout:port=8501"]);
    }
}
