use serde::{Deserialize, Serialize};

use crate::error::{ContactError, SubmitError};

pub const SIMULATED_SEND_MS: u32 = 1500;
pub const SUCCESS_MESSAGE_MS: u32 = 5000;
pub const SENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent. We'll get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }
        if !is_plausible_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingMessage);
        }
        Ok(())
    }
}

pub fn is_plausible_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactTransport {
    Simulated { delay_ms: u32 },
    Endpoint { url: String },
}

impl Default for ContactTransport {
    fn default() -> Self {
        ContactTransport::Simulated {
            delay_ms: SIMULATED_SEND_MS,
        }
    }
}

/// State to apply to the submit control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum SubmitPhase {
    #[default]
    Idle,
    Sending {
        original_label: String,
    },
}

/// Disables the control for the lifetime of one submission and restores it afterwards.
#[derive(Clone, Debug, Default)]
pub struct SubmitController {
    phase: SubmitPhase,
    sending_label: String,
}

impl SubmitController {
    pub fn new(sending_label: &str) -> Self {
        Self {
            phase: SubmitPhase::Idle,
            sending_label: sending_label.to_string(),
        }
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, SubmitPhase::Sending { .. })
    }

    pub fn begin(&mut self, current_label: &str) -> Result<SubmitControl, SubmitError> {
        if self.is_sending() {
            return Err(SubmitError::InFlight);
        }
        self.phase = SubmitPhase::Sending {
            original_label: current_label.to_string(),
        };
        let label = if self.sending_label.is_empty() {
            current_label.to_string()
        } else {
            self.sending_label.clone()
        };
        Ok(SubmitControl {
            disabled: true,
            label,
        })
    }

    /// Runs on success and failure alike.
    pub fn finish(&mut self) -> Option<SubmitControl> {
        match std::mem::take(&mut self.phase) {
            SubmitPhase::Sending { original_label } => Some(SubmitControl {
                disabled: false,
                label: original_label,
            }),
            SubmitPhase::Idle => None,
        }
    }
}
