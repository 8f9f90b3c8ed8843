use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Availability lookup for {domain} failed: {message}")]
    OracleError { domain: String, message: String },

    #[error("Clipboard error: {message}")]
    ClipboardError { message: String },

    #[error("Cannot purchase: {count} of {required} domains selected")]
    PurchaseNotAllowed { count: usize, required: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    System,
    Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::ConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CartError::HttpError(_) | CartError::OracleError { .. } => ErrorCategory::Network,
            CartError::IoError(_)
            | CartError::SerializationError(_)
            | CartError::ClipboardError { .. } => ErrorCategory::System,
            CartError::PurchaseNotAllowed { .. } => ErrorCategory::Cart,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CartError::PurchaseNotAllowed { .. } => ErrorSeverity::Low,
            CartError::HttpError(_)
            | CartError::OracleError { .. }
            | CartError::ClipboardError { .. } => ErrorSeverity::Medium,
            CartError::ConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. }
            | CartError::SerializationError(_) => ErrorSeverity::High,
            CartError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value `{}` is invalid: {}", field, reason)
            }
            CartError::MissingConfigError { field } => {
                format!("Configuration value `{}` is required", field)
            }
            CartError::PurchaseNotAllowed { count, required } => format!(
                "Select exactly {} domains before purchasing ({} selected)",
                required, count
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the TOML file and command line flags",
            ErrorCategory::Network => "Check the RDAP endpoint or retry the availability check",
            ErrorCategory::System => "Check file permissions and the clipboard command",
            ErrorCategory::Cart => "Add or remove domains until the cart is full",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_gate_is_low_severity() {
        let err = CartError::PurchaseNotAllowed {
            count: 4,
            required: 5,
        };
        assert_eq!(err.category(), ErrorCategory::Cart);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("exactly 5"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = CartError::InvalidConfigValueError {
            field: "cart.required_count".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "Configuration value `cart.required_count` is invalid: Value must be at least 1"
        );
    }
}
