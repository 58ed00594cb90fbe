use std::time::Duration;

use crate::config::Endpoint;

pub const LDAP_PORT: u16 = 389;
pub const LDAPS_PORT: u16 = 636;

/// Describes the connection a bind will use. Nothing is opened until the
/// binder uses the handle, so unreachable endpoints surface at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl SessionHandle {
    pub fn url(&self) -> String {
        let scheme = if self.secure { "ldaps" } else { "ldap" };
        // Bare IPv6 literals need brackets in a URL
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.port)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionFactory {
    endpoint: Endpoint,
}

impl SessionFactory {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// The port is chosen by the transport-security flag alone.
    pub fn build(&self) -> SessionHandle {
        let port = if self.endpoint.ssl { LDAPS_PORT } else { LDAP_PORT };
        SessionHandle {
            host: self.endpoint.server.trim().to_string(),
            port,
            secure: self.endpoint.ssl,
            timeout: self.endpoint.timeout,
            verify_tls: self.endpoint.verify_tls,
        }
    }
}
