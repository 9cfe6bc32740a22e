//! Loopback certificate carve-out.
//!
//! The webview rejects invalid certificates on its own. The native
//! certificate-error signal of each engine is routed through
//! [`certificate_error_decision`] so only the local backend can be waved
//! through: `load-failed-with-tls-errors` on WebKitGTK and
//! `ServerCertificateErrorDetected` on WebView2. WKWebView exposes no such hook
//! outside its navigation delegate, which the webview layer owns, so macOS
//! keeps the engine's default of blocking.

use tauri::WebviewWindow;
use url::{Host, Url};

use crate::append_desktop_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateErrorDecision {
    Proceed,
    Block,
}

/// Certificate failures are only waved through for plain `http://localhost`,
/// where the local backend may present a self-signed certificate or none.
pub fn certificate_error_decision(raw_url: &str) -> CertificateErrorDecision {
    let Ok(parsed) = Url::parse(raw_url.trim()) else {
        return CertificateErrorDecision::Block;
    };

    match parsed.host() {
        Some(Host::Domain(domain))
            if parsed.scheme() == "http" && domain.eq_ignore_ascii_case("localhost") =>
        {
            CertificateErrorDecision::Proceed
        }
        _ => CertificateErrorDecision::Block,
    }
}

/// Decides a certificate failure reported by the engine and logs the outcome.
#[cfg_attr(
    not(any(target_os = "linux", target_os = "windows")),
    allow(dead_code)
)]
pub fn resolve_certificate_error<F>(raw_url: &str, log: F) -> CertificateErrorDecision
where
    F: Fn(&str),
{
    let decision = certificate_error_decision(raw_url);
    match decision {
        CertificateErrorDecision::Proceed => {
            log(&format!("certificate error ignored for local backend {raw_url}"))
        }
        CertificateErrorDecision::Block => {
            log(&format!("certificate error blocked navigation to {raw_url}"))
        }
    }
    decision
}

/// Registers the engine's certificate-error handler on `window`. The handler
/// itself is attached on the main thread.
pub fn install_certificate_error_hook(window: &WebviewWindow) -> Result<(), String> {
    window
        .with_webview(|webview| {
            if let Err(error) = attach_certificate_error_handler(webview) {
                append_desktop_log(&error);
            }
        })
        .map_err(|error| format!("Failed to reach main webview: {error}"))
}

#[cfg(target_os = "linux")]
fn attach_certificate_error_handler(webview: tauri::webview::PlatformWebview) -> Result<(), String> {
    use webkit2gtk::{WebContextExt, WebViewExt};

    webview
        .inner()
        .connect_load_failed_with_tls_errors(|view, failing_uri, certificate, _errors| {
            if resolve_certificate_error(failing_uri, append_desktop_log)
                == CertificateErrorDecision::Block
            {
                return false;
            }

            let host = Url::parse(failing_uri)
                .ok()
                .and_then(|url| url.host_str().map(str::to_string));
            match (view.context(), host) {
                (Some(context), Some(host)) => {
                    context.allow_tls_certificate_for_host(certificate, &host);
                    view.load_uri(failing_uri);
                    true
                }
                _ => {
                    append_desktop_log(&format!(
                        "cannot trust certificate for {failing_uri}: no web context or host"
                    ));
                    false
                }
            }
        });
    Ok(())
}

#[cfg(target_os = "windows")]
fn attach_certificate_error_handler(webview: tauri::webview::PlatformWebview) -> Result<(), String> {
    use webview2_com::{
        take_pwstr,
        Microsoft::Web::WebView2::Win32::{
            ICoreWebView2_14, COREWEBVIEW2_SERVER_CERTIFICATE_ERROR_ACTION_ALWAYS_ALLOW,
            COREWEBVIEW2_SERVER_CERTIFICATE_ERROR_ACTION_CANCEL,
        },
        ServerCertificateErrorDetectedEventHandler,
    };
    use windows::core::{Interface, PWSTR};

    let core = unsafe { webview.controller().CoreWebView2() }
        .map_err(|error| format!("Failed to read WebView2 core: {error}"))?;
    let core = core
        .cast::<ICoreWebView2_14>()
        .map_err(|error| format!("WebView2 runtime has no certificate-error event: {error}"))?;

    let handler = ServerCertificateErrorDetectedEventHandler::create(Box::new(|_, args| {
        let Some(args) = args else {
            return Ok(());
        };
        let mut uri = PWSTR::null();
        unsafe { args.RequestUri(&mut uri)? };
        let uri = take_pwstr(uri);
        let action = match resolve_certificate_error(&uri, append_desktop_log) {
            CertificateErrorDecision::Proceed => {
                COREWEBVIEW2_SERVER_CERTIFICATE_ERROR_ACTION_ALWAYS_ALLOW
            }
            CertificateErrorDecision::Block => COREWEBVIEW2_SERVER_CERTIFICATE_ERROR_ACTION_CANCEL,
        };
        unsafe { args.SetAction(action) }
    }));

    let mut token = 0i64;
    unsafe { core.add_ServerCertificateErrorDetected(&handler, &mut token) }
        .map_err(|error| format!("Failed to register certificate-error handler: {error}"))
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn attach_certificate_error_handler(_webview: tauri::webview::PlatformWebview) -> Result<(), String> {
    append_desktop_log("certificate errors use the webview default on this platform");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn certificate_errors_proceed_for_local_backend() {
        assert_eq!(
            certificate_error_decision("http://localhost:8501"),
            CertificateErrorDecision::Proceed
        );
        assert_eq!(
            certificate_error_decision("http://localhost/_stcore/health"),
            CertificateErrorDecision::Proceed
        );
    }

    #[test]
    fn resolved_certificate_errors_are_logged_with_their_outcome() {
        let logs = RefCell::new(Vec::new());
        let decision = resolve_certificate_error("http://localhost:8501/", |line| {
            logs.borrow_mut().push(line.to_string())
        });
        assert_eq!(decision, CertificateErrorDecision::Proceed);

        let decision = resolve_certificate_error("https://example.com/", |line| {
            logs.borrow_mut().push(line.to_string())
        });
        assert_eq!(decision, CertificateErrorDecision::Block);

        let logs = logs.borrow();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].contains("ignored for local backend http://localhost:8501/"));
        assert!(logs[1].contains("blocked navigation to https://example.com/"));
    }

    #[test]
    fn certificate_errors_block_everything_else() {
        for url in [
            "https://example.com",
            "https://localhost:8501",
            "http://localhost.evil.example:8501",
            "http://127.0.0.1:8501",
            "not a url",
            "",
        ] {
            assert_eq!(
                certificate_error_decision(url),
                CertificateErrorDecision::Block,
                "url = {url:?}"
            );
        }
    }
}
