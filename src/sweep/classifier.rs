//! Maps raw bind outcomes to [`AttemptResult`]s.
//!
//! Active Directory reports the reason for a failed bind as a sub-code embedded
//! in the diagnostic message (`... AcceptSecurityContext error, data 52e, v4563`).
//! The substring table is data so other vendors can be added from the config file.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::directory::binder::RawBindOutcome;
use crate::directory::codes::result_code_name;
use super::state::AttemptResult;

/// Failure outcomes a classification rule can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidCredentials,
    MustResetPassword,
    AccountDisabled,
    PasswordExpired,
    AccountLocked,
}

impl RejectionKind {
    fn to_result(self) -> AttemptResult {
        match self {
            Self::InvalidCredentials => AttemptResult::InvalidCredentials,
            Self::MustResetPassword => AttemptResult::MustResetPassword,
            Self::AccountDisabled => AttemptResult::AccountDisabled,
            Self::PasswordExpired => AttemptResult::PasswordExpired,
            Self::AccountLocked => AttemptResult::AccountLocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassificationRule {
    /// Case-insensitive substring of the server's diagnostic message.
    pub pattern: String,
    pub outcome: RejectionKind,
}

impl ClassificationRule {
    pub fn new(pattern: impl Into<String>, outcome: RejectionKind) -> Self {
        Self { pattern: pattern.into(), outcome }
    }

    fn matches(&self, message_lower: &str) -> bool {
        message_lower.contains(&self.pattern.to_ascii_lowercase())
    }
}

/// Built-in Active Directory sub-codes.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new("data 52e", RejectionKind::InvalidCredentials),
        ClassificationRule::new("data 773", RejectionKind::MustResetPassword),
        ClassificationRule::new("data 533", RejectionKind::AccountDisabled),
        ClassificationRule::new("data 532", RejectionKind::PasswordExpired),
        ClassificationRule::new("data 775", RejectionKind::AccountLocked),
    ]
}

#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self { rules: default_rules() }
    }
}

impl ResponseClassifier {
    /// Built-in table with `extra` rules checked first.
    pub fn with_rules(extra: &[ClassificationRule]) -> Self {
        let mut rules = extra.to_vec();
        rules.extend(default_rules());
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Total over every input: the first matching rule wins, otherwise `Unknown`.
    pub fn classify(&self, raw: &RawBindOutcome) -> AttemptResult {
        match raw {
            RawBindOutcome::Bound => AttemptResult::Success,
            RawBindOutcome::TransportFailure(message) => {
                AttemptResult::TransportError(message.clone())
            }
            RawBindOutcome::Rejected { code, message } => {
                let lower = message.to_ascii_lowercase();
                self.rules
                    .iter()
                    .find(|rule| rule.matches(&lower))
                    .map(|rule| rule.outcome.to_result())
                    .unwrap_or_else(|| AttemptResult::Unknown(describe_rejection(*code, message)))
            }
        }
    }
}

/// `rc=53 (unwillingToPerform): <message>`, the detail kept for unknown outcomes.
pub fn describe_rejection(code: u32, message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        format!("rc={} ({})", code, result_code_name(code))
    } else {
        format!("rc={} ({}): {}", code, result_code_name(code), message)
    }
}

fn sub_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bdata ([0-9a-f]+)\b").expect("sub-code pattern is valid")
    })
}

/// Extract the embedded sub-code (`52e`, `775`, ...) for display.
pub fn extract_sub_code(message: &str) -> Option<String> {
    sub_code_regex()
        .captures(message)
        .map(|caps| caps[1].to_ascii_lowercase())
}
