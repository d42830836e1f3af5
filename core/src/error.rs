use thiserror::Error;

/// Lectern error types
#[derive(Error, Debug)]
pub enum LecternError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A step reference did not match any named step
    #[error("No step named {0}")]
    UnknownStep(String),

    /// A positional step reference was out of range
    #[error("Step index {reference} is too big ({count} steps configured). Indexing begins with 0.")]
    StepIndexTooBig { reference: String, count: usize },

    /// A backend selector did not match any registered driver
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// Driver-level failure outside step execution
    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend's container runtime cannot be reached
    #[error("Backend connection failed: {0}")]
    Connectivity(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LecternError {
    fn from(err: serde_json::Error) -> Self {
        LecternError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for LecternError {
    fn from(err: serde_yaml::Error) -> Self {
        LecternError::Serialization(err.to_string())
    }
}

/// Result type alias for Lectern operations
pub type Result<T> = std::result::Result<T, LecternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = LecternError::Config("Missing image name (img)".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing image name (img)"
        );
    }

    #[test]
    fn test_unknown_step_display() {
        let error = LecternError::UnknownStep("lint".to_string());
        assert_eq!(error.to_string(), "No step named lint");
    }

    #[test]
    fn test_step_index_too_big_display() {
        let error = LecternError::StepIndexTooBig {
            reference: "5".to_string(),
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "Step index 5 is too big (3 steps configured). Indexing begins with 0."
        );
    }

    #[test]
    fn test_unknown_backend_display() {
        let error = LecternError::UnknownBackend("podman".to_string());
        assert_eq!(error.to_string(), "Unknown backend: podman");
    }

    #[test]
    fn test_connectivity_error_display() {
        let error = LecternError::Connectivity("daemon socket missing".to_string());
        assert_eq!(
            error.to_string(),
            "Backend connection failed: daemon socket missing"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LecternError = io_error.into();
        assert!(matches!(error, LecternError::Io(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_str = "{ invalid json }";
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str(json_str);
        let error: LecternError = result.unwrap_err().into();
        assert!(matches!(error, LecternError::Serialization(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let yaml_str = "invalid: yaml: content:";
        let result: std::result::Result<serde_yaml::Value, _> = serde_yaml::from_str(yaml_str);
        let error: LecternError = result.unwrap_err().into();
        assert!(matches!(error, LecternError::Serialization(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let error = LecternError::Backend("container exited early".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("Backend"));
    }
}
