//! Story generation gateway error types.

/// Failure conditions of the upstream text-generation call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// API key not found in environment
    #[display("Story gateway API key not configured (expected in {})", _0)]
    MissingApiKey(String),
    /// Upstream rejected the call because of request rate (HTTP 429)
    #[display("Rate limit exceeded: {}", _0)]
    RateLimited(String),
    /// Upstream credits or quota are exhausted (HTTP 402)
    #[display("Generation quota exhausted: {}", _0)]
    QuotaExhausted(String),
    /// Upstream returned any other non-success status
    #[display("Generation request failed with HTTP {}: {}", status, message)]
    Request {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Request never produced a response (connect, timeout, cancelled)
    #[display("Generation transport error: {}", _0)]
    Transport(String),
    /// Response body did not have the chat-completions shape
    #[display("Generation response could not be read: {}", _0)]
    ResponseParsing(String),
}

impl GatewayErrorKind {
    /// Maps a non-success HTTP status to its gateway condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use huntcraft_error::GatewayErrorKind;
    ///
    /// let kind = GatewayErrorKind::from_status(429, "slow down");
    /// assert!(matches!(kind, GatewayErrorKind::RateLimited(_)));
    /// ```
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => GatewayErrorKind::RateLimited(message),
            402 => GatewayErrorKind::QuotaExhausted(message),
            _ => GatewayErrorKind::Request { status, message },
        }
    }
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use huntcraft_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::QuotaExhausted("add credits".to_string()));
/// assert!(err.is_quota_exhausted());
/// assert!(format!("{}", err).contains("quota"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the upstream asked the caller to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::RateLimited(_))
    }

    /// True when the upstream account has no remaining credits.
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::QuotaExhausted(_))
    }
}
