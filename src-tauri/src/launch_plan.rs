use std::path::PathBuf;

use crate::{
    backend_config, LaunchPlan, BACKEND_ENTRY_SCRIPT, BACKEND_MODULE, BACKEND_PORT,
    BACKEND_PORT_ENV,
};

/// Interpreter name for the given `std::env::consts::OS` value.
pub fn python_command_for_os(os: &str) -> &'static str {
    if os == "windows" {
        "python"
    } else {
        "python3"
    }
}

pub fn backend_args() -> Vec<String> {
    [
        "-m",
        BACKEND_MODULE,
        "run",
        BACKEND_ENTRY_SCRIPT,
        "--server.headless",
        "true",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub fn backend_env() -> Vec<(String, String)> {
    vec![
        (BACKEND_PORT_ENV.to_string(), BACKEND_PORT.to_string()),
        ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
    ]
}

pub fn build_launch_plan(os: &str, cwd: PathBuf) -> LaunchPlan {
    LaunchPlan {
        cmd: python_command_for_os(os).to_string(),
        args: backend_args(),
        cwd,
        env: backend_env(),
    }
}

pub fn resolve_launch_plan(resource_dir: Option<PathBuf>) -> LaunchPlan {
    let cwd = backend_config::resolve_app_dir(resource_dir);
    build_launch_plan(std::env::consts::OS, cwd)
}

pub fn build_debug_command(plan: &LaunchPlan) -> String {
    let parts = std::iter::once(plan.cmd.as_str()).chain(plan.args.iter().map(String::as_str));
    shlex::try_join(parts).unwrap_or_else(|_| {
        let mut joined = plan.cmd.clone();
        for arg in &plan.args {
            joined.push(' ');
            joined.push_str(arg);
        }
        joined
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_command_is_python_only_on_windows() {
        assert_eq!(python_command_for_os("windows"), "python");
        for os in ["linux", "macos", "freebsd", "openbsd", "android", "ios", ""] {
            assert_eq!(python_command_for_os(os), "python3", "os = {os}");
        }
    }

    #[test]
    fn build_launch_plan_runs_entry_script_headless() {
        let plan = build_launch_plan("linux", PathBuf::from("/opt/file-compare"));
        assert_eq!(plan.cmd, "python3");
        assert_eq!(
            plan.args,
            vec!["-m", "streamlit", "run", "app.py", "--server.headless", "true"]
        );
        assert_eq!(plan.cwd, PathBuf::from("/opt/file-compare"));
    }

    #[test]
    fn backend_env_pins_port_to_8501() {
        let env = backend_env();
        let port: Vec<_> = env
            .iter()
            .filter(|(key, _)| key == "STREAMLIT_SERVER_PORT")
            .collect();
        assert_eq!(port.len(), 1);
        assert_eq!(port[0].1, "8501");
    }

    #[test]
    fn build_debug_command_quotes_nothing_for_plain_args() {
        let plan = build_launch_plan("windows", PathBuf::from("."));
        assert_eq!(
            build_debug_command(&plan),
            "python -m streamlit run app.py --server.headless true"
        );
    }
}
