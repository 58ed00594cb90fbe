//! Anonymous RootDSE probe.

use ldap3::{Scope, SearchEntry};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::config::Endpoint;
use crate::errors::SweepError;
use super::codes::result_code_name;
use super::ldap::connect;
use super::session::SessionFactory;

/// RootDSE attributes requested in addition to the user attributes (`*`).
const ROOT_DSE_ATTRS: &[&str] = &[
    "*",
    "+",
    "namingContexts",
    "defaultNamingContext",
    "supportedLDAPVersion",
    "supportedSASLMechanisms",
    "supportedControl",
    "dnsHostName",
    "serverName",
    "domainFunctionality",
];

/// Server metadata read from the RootDSE.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceMetadata {
    pub url: String,
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl ServiceMetadata {
    pub fn from_attrs(url: impl Into<String>, attrs: HashMap<String, Vec<String>>) -> Self {
        Self {
            url: url.into(),
            attributes: attrs.into_iter().collect(),
        }
    }

    /// Attribute values by case-insensitive name.
    pub fn get(&self, name: &str) -> &[String] {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn naming_contexts(&self) -> &[String] {
        self.get("namingContexts")
    }

    pub fn supported_versions(&self) -> Vec<u32> {
        let mut versions: Vec<u32> = self
            .get("supportedLDAPVersion")
            .iter()
            .filter_map(|v| v.trim().parse().ok())
            .collect();
        versions.sort_unstable();
        versions
    }

    pub fn default_naming_context(&self) -> Option<&str> {
        self.get("defaultNamingContext").first().map(String::as_str)
    }

    pub fn dns_host_name(&self) -> Option<&str> {
        self.get("dnsHostName").first().map(String::as_str)
    }
}

/// Single-shot unauthenticated bind followed by a base-scope RootDSE read.
/// No retry: a failure is returned as-is.
pub async fn probe(endpoint: &Endpoint) -> Result<ServiceMetadata, SweepError> {
    endpoint.validate()?;
    let session = SessionFactory::new(endpoint.clone()).build();
    let url = session.url();
    info!(url = %url, "Anonymous RootDSE bind");

    let mut ldap = connect(&session).await?;

    let bind = tokio::time::timeout(session.timeout, ldap.simple_bind("", ""))
        .await
        .map_err(|_| SweepError::Transport("anonymous bind timed out".into()))??;
    if bind.rc != 0 {
        return Err(SweepError::Transport(format!(
            "anonymous bind rejected: rc={} ({}) {}",
            bind.rc,
            result_code_name(bind.rc),
            bind.text
        )));
    }

    let search = tokio::time::timeout(
        session.timeout,
        ldap.search("", Scope::Base, "(objectClass=*)", ROOT_DSE_ATTRS.to_vec()),
    )
    .await
    .map_err(|_| SweepError::Transport("RootDSE search timed out".into()))??;
    let (entries, _) = search
        .success()
        .map_err(|e| SweepError::Transport(format!("RootDSE search failed: {}", e)))?;

    if let Err(e) = ldap.unbind().await {
        debug!(error = %e, "Unbind failed");
    }

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| SweepError::Transport("RootDSE returned no entry".into()))?;
    let entry = SearchEntry::construct(entry);
    debug!(attributes = entry.attrs.len(), "RootDSE read");

    Ok(ServiceMetadata::from_attrs(url, entry.attrs))
}
