/*!
 * Error types for the yaltwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Coarse classification of a provider failure, used to decide on retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The account ran out of quota
    QuotaExceeded,
    /// The account has a billing problem
    Billing,
    /// Network, rate limit or server side fault
    Transient,
    /// Anything else
    Other,
}

impl ServiceErrorKind {
    /// Whether a failure of this kind must abort instead of being retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::QuotaExceeded | Self::Billing)
    }
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The account quota is exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The account cannot be billed
    #[error("Billing error: {0}")]
    BillingError(String),
}

impl ProviderError {
    /// Classify this error for retry decisions.
    ///
    /// Quota and billing problems are also recognised from the message text,
    /// since some APIs report them through generic status codes.
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::QuotaExceeded(_) => ServiceErrorKind::QuotaExceeded,
            Self::BillingError(_) => ServiceErrorKind::Billing,
            _ => {
                let message = self.to_string().to_lowercase();
                if mentions_quota(&message) {
                    ServiceErrorKind::QuotaExceeded
                } else if mentions_billing(&message) {
                    ServiceErrorKind::Billing
                } else {
                    match self {
                        Self::RequestFailed(_)
                        | Self::ConnectionError(_)
                        | Self::RateLimitExceeded(_) => ServiceErrorKind::Transient,
                        Self::ApiError { status_code, .. } if *status_code >= 500 => {
                            ServiceErrorKind::Transient
                        }
                        _ => ServiceErrorKind::Other,
                    }
                }
            }
        }
    }

    /// Whether this error must not be retried
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }

    /// Build an error from a non-success HTTP response
    pub fn from_api_response(status_code: u16, body: &str) -> Self {
        let lowered = body.to_lowercase();
        let message = body.trim().to_string();

        if mentions_quota(&lowered) {
            Self::QuotaExceeded(message)
        } else if mentions_billing(&lowered) {
            Self::BillingError(message)
        } else {
            match status_code {
                429 => Self::RateLimitExceeded(message),
                401 | 403 => Self::AuthenticationError(message),
                _ => Self::ApiError { status_code, message },
            }
        }
    }
}

fn mentions_quota(message: &str) -> bool {
    message.contains("insufficient_quota") || message.contains("quota")
}

fn mentions_billing(message: &str) -> bool {
    message.contains("billing") || message.contains("credit balance")
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur during document translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A chunk could not be translated, so the whole document is abandoned
    #[error("Chunk {} of {total_chunks} failed to translate: {source}", .chunk_index + 1)]
    ChunkFailed {
        /// Zero-based index of the failing chunk
        chunk_index: usize,
        /// Number of chunks in the document
        total_chunks: usize,
        /// Last error reported by the provider
        source: ProviderError,
    },

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether the underlying provider failure is fatal (quota, billing)
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ChunkFailed { source, .. } => source.is_fatal(),
            Self::Provider(e) => e.is_fatal(),
        }
    }
}

/// Errors raised by the syntax repair engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepairError {
    /// The document shape is broken beyond line-local repair
    #[error("Translation resulted in invalid YAML structure at line {line} ({message}) - needs retranslation")]
    NeedsRetranslation {
        /// 1-based line reported by the parser
        line: usize,
        /// Parser message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the repair engine
    #[error("Repair error: {0}")]
    Repair(#[from] RepairError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Whether this error asks for the file to be translated again
    pub fn needs_retranslation(&self) -> bool {
        matches!(self, Self::Repair(RepairError::NeedsRetranslation { .. }))
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
