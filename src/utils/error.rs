use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskPlanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Validation,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code; `Low` is a warning and the run still succeeds.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DiskPlanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DiskPlanError::IoError(_) => ErrorCategory::Io,
            DiskPlanError::TomlError(_)
            | DiskPlanError::SerializationError(_)
            | DiskPlanError::ConfigValidationError { .. }
            | DiskPlanError::InvalidConfigValueError { .. }
            | DiskPlanError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DiskPlanError::ValidationError { .. } => ErrorCategory::Validation,
            DiskPlanError::UnknownVariant { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DiskPlanError::ValidationError { .. } => ErrorSeverity::Low,
            DiskPlanError::UnknownVariant { .. } => ErrorSeverity::Medium,
            DiskPlanError::TomlError(_)
            | DiskPlanError::ConfigValidationError { .. }
            | DiskPlanError::InvalidConfigValueError { .. }
            | DiskPlanError::MissingConfigError { .. } => ErrorSeverity::High,
            DiskPlanError::IoError(_) | DiskPlanError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DiskPlanError::IoError(_) => {
                "Check that the file exists and is readable".to_string()
            }
            DiskPlanError::TomlError(_) => {
                "Fix the TOML syntax; unknown keys and wrong value types are rejected".to_string()
            }
            DiskPlanError::SerializationError(_) => {
                "Report this as a bug; the evaluation result could not be encoded".to_string()
            }
            DiskPlanError::ConfigValidationError { field, .. }
            | DiskPlanError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration file", field)
            }
            DiskPlanError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            DiskPlanError::ValidationError { .. } => {
                "Adjust the proposed disk configuration to the allowed ranges".to_string()
            }
            DiskPlanError::UnknownVariant { kind, .. } => {
                format!("Use one of the supported {} values", kind)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => format!("Proposed configuration is invalid: {}", self),
            ErrorCategory::Input => format!("Unrecognised input: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiskPlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_drives_exit_codes() {
        let io = DiskPlanError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        let invalid = DiskPlanError::ValidationError {
            message: "iops".to_string(),
        };
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert_eq!(invalid.severity(), ErrorSeverity::Low);
        assert!(io.severity() > invalid.severity());
        assert_eq!(io.severity().exit_code(), 3);
        assert_eq!(invalid.severity().exit_code(), 0);
    }

    #[test]
    fn test_recovery_suggestion_names_field() {
        let err = DiskPlanError::MissingConfigError {
            field: "current.throughput_mbps".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.recovery_suggestion().contains("current.throughput_mbps"));
    }
}
