pub mod binder;
pub mod codes;
pub mod ldap;
pub mod probe;
pub mod session;

pub use binder::{BindMechanism, DirectoryBinder, RawBindOutcome};
pub use ldap::LdapBinder;
pub use probe::{probe, ServiceMetadata};
pub use session::{SessionFactory, SessionHandle, LDAP_PORT, LDAPS_PORT};
