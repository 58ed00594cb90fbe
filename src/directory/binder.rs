use async_trait::async_trait;

use crate::config::Credential;
use crate::errors::SweepError;
use super::session::SessionHandle;

/// Raw outcome of a bind as the directory reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBindOutcome {
    Bound,
    /// Non-zero LDAP result code with the server's diagnostic message.
    Rejected { code: u32, message: String },
    TransportFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMechanism {
    Simple,
    NtlmHash,
}

impl BindMechanism {
    pub fn for_credential(credential: &Credential) -> Self {
        match credential {
            Credential::Password(_) => Self::Simple,
            Credential::NtHash(_) => Self::NtlmHash,
        }
    }
}

/// External directory bind operation.
///
/// Implementations return `Err` only for transport-level problems; the
/// orchestrator turns those into `RawBindOutcome::TransportFailure`.
#[async_trait]
pub trait DirectoryBinder: Send + Sync {
    async fn bind(
        &self,
        session: &SessionHandle,
        identity: &str,
        credential: &Credential,
    ) -> Result<RawBindOutcome, SweepError>;

    /// Whether this binder can authenticate with the given mechanism.
    fn supports(&self, mechanism: BindMechanism) -> bool;

    /// Binder name for logging
    fn name(&self) -> &str;
}
