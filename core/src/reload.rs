use serde::{Deserialize, Serialize};

pub const RELOAD_SOCKET_URL: &str = "ws://localhost:8080";
pub const RELOAD_MESSAGE: &str = "reload";
pub const SOCKET_FALLBACK_MS: u32 = 2000;
pub const POLL_INTERVAL_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevReloadMode {
    /// Only on development hosts.
    #[default]
    Auto,
    Always,
    Never,
}

pub fn should_enable(mode: DevReloadMode, hostname: &str, dev_hosts: &[String]) -> bool {
    match mode {
        DevReloadMode::Always => true,
        DevReloadMode::Never => false,
        DevReloadMode::Auto => {
            let hostname = hostname.trim();
            dev_hosts
                .iter()
                .any(|host| host.trim().eq_ignore_ascii_case(hostname))
        }
    }
}

pub fn is_reload_signal(message: &str) -> bool {
    message.trim() == RELOAD_MESSAGE
}

/// Validators of the page resource seen by one `HEAD` poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollFingerprint {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl PollFingerprint {
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReloadPoller {
    baseline: Option<PollFingerprint>,
}

impl ReloadPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the page changed since the first poll.
    pub fn observe(&mut self, fingerprint: PollFingerprint) -> bool {
        if fingerprint.is_empty() {
            return false;
        }
        match self.baseline.as_ref() {
            None => {
                self.baseline = Some(fingerprint);
                false
            }
            Some(baseline) => *baseline != fingerprint,
        }
    }
}
