use serde::Deserialize;
use std::time::Duration;

use crate::errors::SweepError;
use crate::sweep::classifier::ClassificationRule;
use crate::sweep::state::GateDecision;

pub const DEFAULT_DELAY_MS: u64 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Directory endpoint shared by the sweep and the anonymous probe.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub server: String,
    pub ssl: bool,
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl Endpoint {
    pub fn new(server: impl Into<String>, ssl: bool) -> Self {
        Self {
            server: server.into(),
            ssl,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: false,
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.server.trim().is_empty() {
            return Err(SweepError::Config("LDAP server is required".into()));
        }
        if self.server.contains("://") {
            return Err(SweepError::Config(format!(
                "Server '{}' must be a host name or address, not a URL",
                self.server
            )));
        }
        if self.timeout.is_zero() {
            return Err(SweepError::Config("Timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

/// NT hash used for pass-the-hash binds, normalised to lowercase hex.
#[derive(Clone, PartialEq, Eq)]
pub struct NtHash(String);

impl NtHash {
    /// Accepts `NT` or `LM:NT`; only the NT half is kept.
    pub fn parse(input: &str) -> Result<Self, SweepError> {
        let trimmed = input.trim();
        let nt = match trimmed.split_once(':') {
            Some((_, nt)) => nt,
            None => trimmed,
        };
        let lower = nt.to_ascii_lowercase();
        let bytes = data_encoding::HEXLOWER
            .decode(lower.as_bytes())
            .map_err(|e| SweepError::InvalidHash(format!("'{}' is not hex: {}", nt, e)))?;
        if bytes.len() != 16 {
            return Err(SweepError::InvalidHash(format!(
                "expected 16 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(lower))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for NtHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NtHash(<redacted>)")
    }
}

/// A credential selector: a password literal or the hash-authentication marker.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Password(String),
    NtHash(NtHash),
}

impl Credential {
    pub fn is_hash(&self) -> bool {
        matches!(self, Self::NtHash(_))
    }

    /// Text safe to show for every attempt.
    pub fn masked(&self) -> String {
        match self {
            Self::Password(pw) => "*".repeat(pw.chars().count().clamp(1, 8)),
            Self::NtHash(_) => "<nt-hash>".to_string(),
        }
    }

    /// Text shown once the directory has accepted the credential.
    pub fn revealed(&self) -> String {
        match self {
            Self::Password(pw) => pw.clone(),
            Self::NtHash(h) => h.as_hex().to_string(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::NtHash(_) => f.write_str("NtHash(<redacted>)"),
        }
    }
}

/// Immutable description of one credential sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub endpoint: Endpoint,
    pub domain: Option<String>,
    pub usernames: Vec<String>,
    pub credentials: Vec<Credential>,
    pub stop_on_success: bool,
    /// `None` prompts the operator; `Some` answers every escalation with the default.
    pub non_interactive: Option<GateDecision>,
    pub delay: Duration,
    pub jitter: Duration,
    /// Extra classification rules, checked before the built-in table.
    pub classification: Vec<ClassificationRule>,
}

impl SweepConfig {
    pub fn new(endpoint: Endpoint, domain: Option<String>) -> Self {
        Self {
            endpoint,
            domain,
            usernames: Vec::new(),
            credentials: Vec::new(),
            stop_on_success: true,
            non_interactive: None,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            jitter: Duration::ZERO,
            classification: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        self.endpoint.validate()?;

        if self.usernames.is_empty() {
            return Err(SweepError::Config("At least one username is required".into()));
        }
        if self.usernames.iter().any(|u| u.trim().is_empty()) {
            return Err(SweepError::Config("Usernames must not be blank".into()));
        }
        if self.domain.as_deref().map_or(true, |d| d.trim().is_empty()) {
            return Err(SweepError::Config("Domain required for authentication".into()));
        }
        if self.credentials.is_empty() {
            return Err(SweepError::Config(
                "At least one password or an NT hash is required".into(),
            ));
        }

        let hashes = self.credentials.iter().filter(|c| c.is_hash()).count();
        if hashes > 1 {
            return Err(SweepError::Config("Only a single NT hash may be supplied".into()));
        }
        if hashes == 1 && self.credentials.len() > 1 {
            return Err(SweepError::Config(
                "An NT hash cannot be combined with passwords".into(),
            ));
        }
        // An empty simple-bind password is an unauthenticated bind and always succeeds.
        if self
            .credentials
            .iter()
            .any(|c| matches!(c, Credential::Password(p) if p.is_empty()))
        {
            return Err(SweepError::Config("Empty passwords are not allowed".into()));
        }
        Ok(())
    }

    /// Domain qualifier; only meaningful after `validate` succeeded.
    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or_default()
    }

    pub fn pair_count(&self) -> usize {
        self.usernames.len() * self.credentials.len()
    }
}

/// Optional YAML configuration file. CLI flags take precedence.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<String>,
    pub ssl: Option<bool>,
    pub domain: Option<String>,
    pub delay_ms: Option<u64>,
    pub jitter_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
    pub stop_on_success: Option<bool>,
    pub non_interactive: Option<bool>,
    pub default_decision: Option<GateDecision>,
    #[serde(default)]
    pub classification: Vec<ClassificationRule>,
}
