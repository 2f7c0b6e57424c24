use super::{ErrorCode, UtilsError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to UtilsError with context
    fn to_utils(self, context: impl Into<String>) -> Result<T, UtilsError>;

    /// Convert to UtilsError with specific error type
    fn to_config_error(self, message: impl Into<String>) -> Result<T, UtilsError>;
    fn to_storage_error(self, message: impl Into<String>) -> Result<T, UtilsError>;
    fn to_render_error(self, message: impl Into<String>) -> Result<T, UtilsError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_utils(self, context: impl Into<String>) -> Result<T, UtilsError> {
        self.map_err(|e| UtilsError::other(context).with_source(e))
    }

    fn to_config_error(self, message: impl Into<String>) -> Result<T, UtilsError> {
        self.map_err(|e| UtilsError::config(message).with_source(e))
    }

    fn to_storage_error(self, message: impl Into<String>) -> Result<T, UtilsError> {
        self.map_err(|e| UtilsError::storage(message).with_source(e))
    }

    fn to_render_error(self, message: impl Into<String>) -> Result<T, UtilsError> {
        self.map_err(|e| UtilsError::render(message).with_source(e))
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;

    /// Create a not found error for configuration
    pub fn config_not_found(path: impl AsRef<Path>) -> UtilsError {
        UtilsError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Configuration file not found: {}", path.as_ref().display()),
            Some(path.as_ref().to_path_buf()),
        )
    }

    /// Create a not found error for an input file
    pub fn file_not_found(what: &str, path: impl AsRef<Path>) -> UtilsError {
        UtilsError::storage_with_code(
            ErrorCode::STORAGE_NOT_FOUND,
            format!("{} not found: {}", what, path.as_ref().display()),
            Some(path.as_ref().to_path_buf()),
        )
    }

    /// Create a validation error for missing field
    pub fn missing_required_field(item: &str, field: &str) -> UtilsError {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_MISSING_FIELD,
            format!("{} item must have '{}' key", item, field),
            Some(field.to_string()),
        )
    }

    /// Create a validation error for a field of the wrong JSON shape
    pub fn wrong_type(item: &str, field: &str, expected: &str) -> UtilsError {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_WRONG_TYPE,
            format!("{} '{}' must be {}", item, field, expected),
            Some(field.to_string()),
        )
    }

    /// Create a validation error for an unrecognized `type` value
    pub fn unknown_kind(kind: &str) -> UtilsError {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_UNKNOWN_KIND,
            format!("Unknown product item type: '{}'", kind),
            Some("type".to_string()),
        )
    }
}

/// Macro for quick error creation with context
#[macro_export]
macro_rules! utils_error {
    (config: $msg:expr) => {
        $crate::error::UtilsError::config($msg)
    };
    (config: $msg:expr, $source:expr) => {
        $crate::error::UtilsError::config($msg).with_source($source)
    };
    (storage: $msg:expr) => {
        $crate::error::UtilsError::storage($msg)
    };
    (storage: $msg:expr, $source:expr) => {
        $crate::error::UtilsError::storage($msg).with_source($source)
    };
    (validation: $msg:expr) => {
        $crate::error::UtilsError::validation($msg)
    };
    (render: $msg:expr) => {
        $crate::error::UtilsError::render($msg)
    };
    (render: $msg:expr, $source:expr) => {
        $crate::error::UtilsError::render($msg).with_source($source)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_extension_trait() {
        let io_result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));

        let utils_result = io_result.to_storage_error("Failed to open file");
        assert!(utils_result.is_err());

        let err = utils_result.unwrap_err();
        assert_eq!(err.code(), ErrorCode::STORAGE_GENERIC);
    }

    #[test]
    fn test_common_error_helpers() {
        let err = common::config_not_found("/data/config.json");
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
        assert!(err.user_message().contains("Configuration problem"));

        let err = common::missing_required_field("Message", "msg");
        assert_eq!(err.code(), ErrorCode::VALIDATION_MISSING_FIELD);
        assert_eq!(err.field(), Some("msg"));
        assert!(err.to_string().contains("'msg'"));

        let err = common::unknown_kind("video");
        assert_eq!(err.code(), ErrorCode::VALIDATION_UNKNOWN_KIND);
        assert!(err.to_string().contains("video"));
    }

    #[test]
    fn test_error_macro() {
        let err = utils_error!(config: "Test error");
        assert_eq!(err.code(), ErrorCode::CONFIG_GENERIC);

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err_with_source = utils_error!(storage: "Storage failed", io_err);
        assert_eq!(err_with_source.code(), ErrorCode::STORAGE_GENERIC);
    }
}
