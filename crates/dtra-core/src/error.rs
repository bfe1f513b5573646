use dtra_shared::{
    RESULT_CODE_AUTHORIZATION_REJECTED, RESULT_CODE_UNABLE_TO_COMPLY,
    RESULT_CODE_UNABLE_TO_DELIVER,
};
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    // ========================================
    // Protocol Errors
    // ========================================
    #[error("Malformed Diameter message: {0}")]
    Decode(String),

    #[error("Missing required AVP: {0}")]
    MissingAvp(u32),

    #[error("Invalid AVP value for code {code}: {reason}")]
    InvalidAvpValue { code: u32, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    // ========================================
    // Translation Errors
    // ========================================
    #[error("No translation rule for request: {0}")]
    UnmappedRequest(String),

    // ========================================
    // Exchange Errors
    // ========================================
    #[error("RADIUS exchange failed: {0}")]
    Forwarding(String),

    #[error("No RADIUS result after {0}ms")]
    CorrelationTimeout(u64),

    #[error("Forwarding queue closed")]
    QueueClosed,

    // ========================================
    // System Errors
    // ========================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // ========================================
    // Network Errors
    // ========================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Convert error to the Diameter Result-Code answered for it
    pub fn to_result_code(&self) -> u32 {
        match self {
            Self::Decode(_) | Self::MissingAvp(_) | Self::InvalidAvpValue { .. } => {
                RESULT_CODE_UNABLE_TO_COMPLY
            }
            Self::UnmappedRequest(_) => RESULT_CODE_UNABLE_TO_COMPLY,
            Self::Forwarding(_) | Self::CorrelationTimeout(_) => {
                RESULT_CODE_AUTHORIZATION_REJECTED
            }
            Self::QueueClosed => RESULT_CODE_UNABLE_TO_DELIVER,
            _ => RESULT_CODE_UNABLE_TO_COMPLY,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Decode(_) | Self::MissingAvp(_) | Self::InvalidAvpValue { .. } => {
                ErrorSeverity::Warning
            }
            Self::UnmappedRequest(_) | Self::CorrelationTimeout(_) => ErrorSeverity::Warning,
            Self::Encoding(_) | Self::Forwarding(_) | Self::Io(_) => ErrorSeverity::Error,
            Self::QueueClosed | Self::Config(_) | Self::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Forwarding(_) | Self::CorrelationTimeout(_) | Self::Io(_)
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
