//! Error taxonomy for relcheck.
//!
//! Only configuration and environment problems surface as errors here.
//! Per-component failures (unreachable repository, missing tag, failing
//! test suite) are recorded as attempt outcomes and never abort a run.

/// Errors that abort a verification run before any component is processed.
#[derive(Debug, thiserror::Error)]
pub enum RelcheckError {
    #[error("component registry not found: {0}")]
    RegistryNotFound(String),

    #[error("no components found in registry")]
    EmptyRegistry,

    #[error("component '{0}' not found in registry")]
    UnknownComponent(String),

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("empty command")]
    EmptyCommand,

    #[error("registry parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relcheck operations.
pub type Result<T> = std::result::Result<T, RelcheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelcheckError::RegistryNotFound("components.yaml".to_string());
        assert!(err.to_string().contains("components.yaml"));

        let err = RelcheckError::UnknownComponent("lib-parser".to_string());
        assert!(err.to_string().contains("lib-parser"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RelcheckError = io.into();
        assert!(err.to_string().contains("denied"));
    }
}
