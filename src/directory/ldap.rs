//! `ldap3`-backed bind transport.

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tracing::{debug, warn};

use crate::config::Credential;
use crate::errors::SweepError;
use super::binder::{BindMechanism, DirectoryBinder, RawBindOutcome};
use super::session::SessionHandle;

/// Opens a fresh connection per attempt, binds once, then unbinds.
#[derive(Debug, Clone, Default)]
pub struct LdapBinder;

impl LdapBinder {
    pub fn new() -> Self {
        Self
    }
}

/// Connect to the handle's URL and spawn the connection driver.
pub(crate) async fn connect(session: &SessionHandle) -> Result<Ldap, SweepError> {
    let settings = LdapConnSettings::new()
        .set_conn_timeout(session.timeout)
        .set_no_tls_verify(!session.verify_tls);

    let url = session.url();
    let (conn, ldap) = LdapConnAsync::with_settings(settings, &url)
        .await
        .map_err(|e| SweepError::Transport(format!("{}: {}", url, e)))?;

    tokio::spawn(async move {
        if let Err(e) = conn.drive().await {
            warn!(error = %e, "LDAP connection driver error");
        }
    });

    Ok(ldap)
}

#[async_trait]
impl DirectoryBinder for LdapBinder {
    async fn bind(
        &self,
        session: &SessionHandle,
        identity: &str,
        credential: &Credential,
    ) -> Result<RawBindOutcome, SweepError> {
        let password = match credential {
            Credential::Password(pw) => pw.as_str(),
            Credential::NtHash(_) => {
                return Err(SweepError::Transport(
                    "NTLM hash binds are not supported by the ldap3 transport".into(),
                ))
            }
        };

        let mut ldap = connect(session).await?;

        let result = tokio::time::timeout(session.timeout, ldap.simple_bind(identity, password))
            .await
            .map_err(|_| {
                SweepError::Transport(format!("bind timed out after {}s", session.timeout.as_secs()))
            })??;

        debug!(rc = result.rc, url = %session.url(), "Bind completed");

        if let Err(e) = ldap.unbind().await {
            debug!(error = %e, "Unbind failed");
        }

        if result.rc == 0 {
            Ok(RawBindOutcome::Bound)
        } else {
            Ok(RawBindOutcome::Rejected {
                code: result.rc,
                message: result.text,
            })
        }
    }

    fn supports(&self, mechanism: BindMechanism) -> bool {
        matches!(mechanism, BindMechanism::Simple)
    }

    fn name(&self) -> &str {
        "ldap3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_simple_only() {
        let binder = LdapBinder::new();
        assert!(binder.supports(BindMechanism::Simple));
        assert!(!binder.supports(BindMechanism::NtlmHash));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let session = SessionHandle {
            host: "127.0.0.1".into(),
            port: 1,
            secure: false,
            timeout: std::time::Duration::from_secs(2),
            verify_tls: false,
        };
        let binder = LdapBinder::new();
        let cred = Credential::Password("pw".into());
        let err = binder.bind(&session, "CORP\\alice", &cred).await.unwrap_err();
        assert!(matches!(err, SweepError::Transport(_)));
    }
}
