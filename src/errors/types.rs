use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid NT hash: {0}")]
    InvalidHash(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ldap3::LdapError> for SweepError {
    fn from(err: ldap3::LdapError) -> Self {
        SweepError::Transport(err.to_string())
    }
}
