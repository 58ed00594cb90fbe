use super::types::SweepError;

impl SweepError {
    /// Short stable name for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            SweepError::Transport(_) => "TransportError",
            SweepError::Prompt(_) => "PromptError",
            SweepError::Config(_) => "ConfigError",
            SweepError::FileNotFound(_) => "FileNotFoundError",
            SweepError::InvalidHash(_) => "InvalidHashError",
            SweepError::Io(_) => "IoError",
            SweepError::Yaml(_) => "YamlError",
            SweepError::Json(_) => "JsonError",
            SweepError::Internal(_) => "InternalError",
        }
    }

    /// Process exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::Config(_) | SweepError::InvalidHash(_) | SweepError::Yaml(_) => 2,
            SweepError::FileNotFound(_) | SweepError::Io(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        assert_eq!(SweepError::Transport("connection refused".into()).error_type(), "TransportError");
        assert_eq!(SweepError::Config("domain missing".into()).error_type(), "ConfigError");
        assert_eq!(SweepError::Prompt("stdin closed".into()).error_type(), "PromptError");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SweepError::Config("x".into()).exit_code(), 2);
        assert_eq!(SweepError::InvalidHash("x".into()).exit_code(), 2);
        assert_eq!(SweepError::FileNotFound("x".into()).exit_code(), 3);
        assert_eq!(SweepError::Internal("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_ldap_error_maps_to_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: SweepError = ldap3::LdapError::from(io).into();
        assert!(matches!(err, SweepError::Transport(_)));
    }
}
