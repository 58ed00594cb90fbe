use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;

use crate::config::Credential;
use crate::errors::SweepError;

/// One (username, credential) combination drawn from the configured lists.
#[derive(Debug, Clone, Copy)]
pub struct CredentialPair<'a> {
    pub username: &'a str,
    pub credential: &'a Credential,
}

impl CredentialPair<'_> {
    /// Down-level logon name submitted in the bind, `DOMAIN\user`.
    pub fn identity(&self, domain: &str) -> String {
        format!("{}\\{}", domain, self.username)
    }
}

/// Semantic outcome of a single bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    InvalidCredentials,
    MustResetPassword,
    AccountDisabled,
    PasswordExpired,
    AccountLocked,
    Unknown(String),
    TransportError(String),
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidCredentials => "invalid-credentials",
            Self::MustResetPassword => "must-reset-password",
            Self::AccountDisabled => "account-disabled",
            Self::PasswordExpired => "password-expired",
            Self::AccountLocked => "account-locked",
            Self::Unknown(_) => "unknown",
            Self::TransportError(_) => "transport-error",
        }
    }

    /// Whether the credential itself was accepted by the directory.
    pub fn is_valid_credential(&self) -> bool {
        matches!(self, Self::Success | Self::MustResetPassword)
    }
}

impl std::fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(detail) | Self::TransportError(detail) => {
                write!(f, "{}: {}", self.as_str(), detail)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Policy output for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDecision {
    Continue,
    StopSweep,
    Escalate,
}

/// Operator answer to an escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDecision {
    Continue,
    Abort,
}

impl GateDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Abort => "abort",
        }
    }
}

impl FromStr for GateDecision {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "c" | "y" | "yes" => Ok(Self::Continue),
            "abort" | "a" | "n" | "no" => Ok(Self::Abort),
            other => Err(SweepError::Config(format!(
                "Invalid decision '{}': expected continue or abort",
                other
            ))),
        }
    }
}

impl std::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    Success,
    MustResetPassword,
    AccountLocked,
    /// The escalation gate answered abort for an unknown or transport outcome.
    OperatorAbort,
    Interrupted,
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::MustResetPassword => write!(f, "must-reset-password"),
            Self::AccountLocked => write!(f, "account-locked"),
            Self::OperatorAbort => write!(f, "operator-abort"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Running,
    Halted(HaltReason),
    Completed,
}

impl SweepState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Process exit code for a terminal state.
    ///
    /// Zero whenever the sweep ran to completion or confirmed a valid credential.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed | Self::Halted(HaltReason::Success) => 0,
            Self::Halted(HaltReason::Interrupted) => 130,
            Self::Halted(_) => 1,
            Self::Running => 1,
        }
    }
}

impl std::fmt::Display for SweepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Halted(reason) => write!(f, "halted ({})", reason),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Tagged record emitted to the reporter for every processed pair.
#[derive(Debug, Clone)]
pub struct AttemptEvent {
    /// 1-based position in username-major order.
    pub index: usize,
    pub username: String,
    pub credential: Credential,
    pub result: AttemptResult,
    pub decision: SweepDecision,
    /// Server diagnostic text for rejected binds.
    pub raw_message: Option<String>,
}

/// A credential the directory accepted.
#[derive(Debug, Clone)]
pub struct ValidCredential {
    pub username: String,
    pub credential: Credential,
    pub must_reset: bool,
}

#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub sweep_id: String,
    pub started_at: DateTime<Utc>,
    pub state: SweepState,
    pub attempts: usize,
    pub planned: usize,
    pub valid: Vec<ValidCredential>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_down_level_name() {
        let cred = Credential::Password("pw1".into());
        let pair = CredentialPair { username: "alice", credential: &cred };
        assert_eq!(pair.identity("CORP"), "CORP\\alice");
    }

    #[test]
    fn test_valid_credential_outcomes() {
        assert!(AttemptResult::Success.is_valid_credential());
        assert!(AttemptResult::MustResetPassword.is_valid_credential());
        assert!(!AttemptResult::AccountLocked.is_valid_credential());
        assert!(!AttemptResult::Unknown("x".into()).is_valid_credential());
    }

    #[test]
    fn test_gate_decision_from_str() {
        assert_eq!("continue".parse::<GateDecision>().unwrap(), GateDecision::Continue);
        assert_eq!("ABORT".parse::<GateDecision>().unwrap(), GateDecision::Abort);
        assert_eq!(" y ".parse::<GateDecision>().unwrap(), GateDecision::Continue);
        assert!("maybe".parse::<GateDecision>().is_err());
    }

    #[test]
    fn test_exit_codes_distinguish_success() {
        assert_eq!(SweepState::Completed.exit_code(), 0);
        assert_eq!(SweepState::Halted(HaltReason::Success).exit_code(), 0);
        assert_eq!(SweepState::Halted(HaltReason::MustResetPassword).exit_code(), 1);
        assert_eq!(SweepState::Halted(HaltReason::Interrupted).exit_code(), 130);
        assert_eq!(SweepState::Halted(HaltReason::AccountLocked).exit_code(), 1);
        assert_eq!(SweepState::Halted(HaltReason::OperatorAbort).exit_code(), 1);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SweepState::Running.is_terminal());
        assert!(SweepState::Completed.is_terminal());
        assert!(SweepState::Halted(HaltReason::Interrupted).is_terminal());
    }

    #[test]
    fn test_attempt_result_display_includes_detail() {
        let r = AttemptResult::Unknown("rc=53 unwillingToPerform".into());
        assert_eq!(r.to_string(), "unknown: rc=53 unwillingToPerform");
        assert_eq!(AttemptResult::AccountLocked.to_string(), "account-locked");
    }
}
