/// Error code registry for brainlife-utils
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Storage (file system) errors
/// - 7000-7999: Validation errors
/// - 8000-8999: Rendering errors
/// - 9000-9999: Other errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_JSON: u16 = 1003;
    pub const CONFIG_NOT_OBJECT: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Storage errors (3000-3999)
    pub const STORAGE_GENERIC: u16 = 3000;
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_PERMISSION_DENIED: u16 = 3002;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_ALREADY_EXISTS: u16 = 3005;
    pub const STORAGE_INVALID_TABLE: u16 = 3013;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_MISSING_FIELD: u16 = 7001;
    pub const VALIDATION_WRONG_TYPE: u16 = 7002;
    pub const VALIDATION_UNKNOWN_KIND: u16 = 7003;
    pub const VALIDATION_INVALID_INPUT: u16 = 7004;
    pub const VALIDATION_RESERVED_KEY: u16 = 7005;
    pub const VALIDATION_DATA_MISSING: u16 = 7006;
    pub const VALIDATION_DATA_KIND: u16 = 7007;

    // Rendering errors (8000-8999)
    pub const RENDER_GENERIC: u16 = 8000;
    pub const RENDER_FAILED: u16 = 8001;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "General configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_INVALID_JSON => "Configuration file is not valid JSON",
        ErrorCode::CONFIG_NOT_OBJECT => "Configuration root must be a JSON object",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",

        ErrorCode::STORAGE_GENERIC => "General storage error",
        ErrorCode::STORAGE_IO_ERROR => "I/O operation failed",
        ErrorCode::STORAGE_PERMISSION_DENIED => "Permission denied",
        ErrorCode::STORAGE_NOT_FOUND => "File or directory not found",
        ErrorCode::STORAGE_ALREADY_EXISTS => "File or directory already exists",
        ErrorCode::STORAGE_INVALID_TABLE => "Tabular file is malformed",

        ErrorCode::VALIDATION_GENERIC => "General validation error",
        ErrorCode::VALIDATION_MISSING_FIELD => "Required field is missing",
        ErrorCode::VALIDATION_WRONG_TYPE => "Field has the wrong type",
        ErrorCode::VALIDATION_UNKNOWN_KIND => "Unknown item type",
        ErrorCode::VALIDATION_INVALID_INPUT => "Invalid input",
        ErrorCode::VALIDATION_RESERVED_KEY => "Key is reserved",
        ErrorCode::VALIDATION_DATA_MISSING => "Input data is missing",
        ErrorCode::VALIDATION_DATA_KIND => "Input data has an unexpected kind",

        ErrorCode::RENDER_GENERIC => "General rendering error",
        ErrorCode::RENDER_FAILED => "Figure rendering failed",

        ErrorCode::OTHER_GENERIC => "General error",

        _ => "Unknown error code",
    }
}
