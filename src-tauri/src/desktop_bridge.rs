//! Read-only host information exposed to the loaded web content.
//!
//! The bridge is plain data: it is serialized once into an initialization
//! script, frozen, and defined as a non-writable global. Content has no way to
//! call back into the host through it.

use serde::Serialize;

use crate::DESKTOP_BRIDGE_GLOBAL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeVersions {
    /// Version of the native host process, i.e. this launcher.
    pub host_runtime: String,
    /// System webview engine version.
    pub render_engine: String,
    /// Desktop framework the shell is built on (`tauri::VERSION`).
    pub shell_runtime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopBridge {
    pub platform: String,
    pub versions: BridgeVersions,
}

impl BridgeVersions {
    pub fn for_launcher(launcher_version: &str, render_engine: String) -> Self {
        Self {
            host_runtime: launcher_version.to_string(),
            render_engine,
            shell_runtime: tauri::VERSION.to_string(),
        }
    }
}

/// Maps Rust's OS names onto the identifiers web code commonly checks for.
pub fn platform_identifier(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

impl DesktopBridge {
    pub fn new(os: &str, versions: BridgeVersions) -> Self {
        Self {
            platform: platform_identifier(os).to_string(),
            versions,
        }
    }

    pub fn for_current_host(launcher_version: &str) -> Self {
        let render_engine =
            tauri::webview_version().unwrap_or_else(|_| "unknown".to_string());
        Self::new(
            std::env::consts::OS,
            BridgeVersions::for_launcher(launcher_version, render_engine),
        )
    }

    pub fn initialization_script(&self) -> Result<String, String> {
        let payload = serde_json::to_string(self)
            .map_err(|error| format!("Failed to serialize desktop bridge: {error}"))?;
        let key = serde_json::to_string(DESKTOP_BRIDGE_GLOBAL)
            .map_err(|error| format!("Failed to serialize desktop bridge key: {error}"))?;

        Ok(format!(
            r#"(function () {{
  var key = {key};
  if (Object.prototype.hasOwnProperty.call(window, key)) {{
    return;
  }}
  var bridge = {payload};
  Object.freeze(bridge.versions);
  Object.defineProperty(window, key, {{
    value: Object.freeze(bridge),
    enumerable: true,
    writable: false,
    configurable: false
  }});
}})();"#
        ))
    }
}
