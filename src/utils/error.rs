use crate::domain::model::ComponentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Component not found: {id}")]
    ComponentNotFound { id: ComponentId },

    #[error("Invalid order specification: {field} = {value} ({reason})")]
    InvalidSpecification {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid catalog entry {id}: {reason}")]
    InvalidCatalogEntry { id: String, reason: String },

    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: String },

    #[error("Order {order_id} already exists at {path}")]
    OrderAlreadyExists { order_id: String, path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Specification,
    Computation,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::ComponentNotFound { .. } | PricingError::InvalidCatalogEntry { .. } => {
                ErrorCategory::Catalog
            }
            PricingError::InvalidSpecification { .. } => ErrorCategory::Specification,
            PricingError::AmountOverflow { .. } => ErrorCategory::Computation,
            PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PricingError::OrderAlreadyExists { .. }
            | PricingError::IoError(_)
            | PricingError::SerializationError(_)
            | PricingError::CsvError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PricingError::ComponentNotFound { .. } | PricingError::InvalidSpecification { .. } => {
                ErrorSeverity::Medium
            }
            PricingError::InvalidCatalogEntry { .. }
            | PricingError::AmountOverflow { .. }
            | PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. }
            | PricingError::OrderAlreadyExists { .. } => ErrorSeverity::High,
            PricingError::IoError(_)
            | PricingError::SerializationError(_)
            | PricingError::CsvError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::ComponentNotFound { id } => format!(
                "Selected paper/finishing option is no longer available (component {})",
                id
            ),
            PricingError::InvalidSpecification { field, reason, .. } => {
                format!("Order specification is invalid: {} {}", field, reason)
            }
            PricingError::InvalidCatalogEntry { id, reason } => {
                format!("The price catalog is malformed at entry {}: {}", id, reason)
            }
            PricingError::AmountOverflow { .. } => {
                "The order is too large to be priced".to_string()
            }
            PricingError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            PricingError::InvalidConfigValueError { field, value, reason } => {
                format!("Configuration value '{}' for '{}' is invalid: {}", value, field, reason)
            }
            PricingError::MissingConfigError { field } => {
                format!("Configuration '{}' is required", field)
            }
            PricingError::OrderAlreadyExists { order_id, .. } => {
                format!("Order {} was already recorded; nothing was overwritten", order_id)
            }
            PricingError::IoError(e) => format!("File access failed: {}", e),
            PricingError::SerializationError(e) => format!("Data could not be read or written: {}", e),
            PricingError::CsvError(e) => format!("CSV output failed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Catalog => {
                "Reload the catalog and choose an option that is currently offered"
            }
            ErrorCategory::Specification => "Page count and copies must both be at least 1",
            ErrorCategory::Computation => "Split the order into smaller orders",
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_not_found_is_catalog_error() {
        let err = PricingError::ComponentNotFound {
            id: ComponentId(99),
        };
        assert_eq!(err.category(), ErrorCategory::Catalog);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Component not found: 99");
        assert!(err.user_friendly_message().contains("no longer available"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: PricingError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
