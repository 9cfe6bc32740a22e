use std::{
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use thiserror::Error;
use url::Url;

use crate::{
    READINESS_INITIAL_BACKOFF, READINESS_MAX_BACKOFF, READINESS_MAX_WAIT, READINESS_PROBE_TIMEOUT,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("backend at {url} did not become ready within {waited_ms}ms ({attempts} probes)")]
    TimedOut {
        url: String,
        waited_ms: u128,
        attempts: u32,
    },
    #[error("backend exited before becoming reachable: {status}")]
    BackendExited { status: String },
    #[error("backend url {url} cannot be probed: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ready,
    NotReady,
    Exited(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max_interval: Duration,
    pub max_wait: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: READINESS_INITIAL_BACKOFF,
            max_interval: READINESS_MAX_BACKOFF,
            max_wait: READINESS_MAX_WAIT,
        }
    }
}

impl BackoffPolicy {
    /// Sleep before probe `attempt + 1`, doubling from `initial` up to `max_interval`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.initial
            .checked_mul(factor)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}

/// Polls `probe` until it reports ready, the backend exits, or the policy's
/// budget is spent. Waiting goes through `sleep` so callers can substitute a
/// clock. Returns the number of probes made.
pub fn wait_for_backend<P, S>(
    url: &str,
    policy: BackoffPolicy,
    mut probe: P,
    mut sleep: S,
) -> Result<u32, ReadinessError>
where
    P: FnMut() -> ProbeOutcome,
    S: FnMut(Duration),
{
    let mut waited = Duration::ZERO;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match probe() {
            ProbeOutcome::Ready => return Ok(attempts),
            ProbeOutcome::Exited(status) => return Err(ReadinessError::BackendExited { status }),
            ProbeOutcome::NotReady => {}
        }

        if waited >= policy.max_wait {
            return Err(ReadinessError::TimedOut {
                url: url.to_string(),
                waited_ms: waited.as_millis(),
                attempts,
            });
        }

        let delay = policy
            .delay_for_attempt(attempts - 1)
            .min(policy.max_wait - waited);
        sleep(delay);
        waited += delay;
    }
}

pub fn backend_socket_addrs(url: &Url) -> Result<Vec<SocketAddr>, ReadinessError> {
    let invalid = |reason: String| ReadinessError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("missing port".to_string()))?;
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|error| invalid(error.to_string()))?
        .collect::<Vec<_>>();
    if addrs.is_empty() {
        return Err(invalid("host resolved to no addresses".to_string()));
    }
    Ok(addrs)
}

pub fn ping_backend(addrs: &[SocketAddr]) -> bool {
    let timeout = READINESS_PROBE_TIMEOUT.max(Duration::from_millis(50));
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}
