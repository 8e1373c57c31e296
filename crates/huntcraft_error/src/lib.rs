//! Error types for the Huntcraft workspace.
//!
//! Every layer gets a location-tracked error struct wrapping a kind enum.
//! [`HuntcraftError`] collects them so higher crates can use `?` across layers.

mod backend;
mod config;
mod database;
mod gateway;
mod story;

pub use backend::BackendError;
pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use story::{Severity, StoryError, StoryErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum HuntcraftErrorKind {
    /// Story assembly, selection or lookup failure
    #[display("{}", _0)]
    Story(StoryError),
    /// Upstream generation failure
    #[display("{}", _0)]
    Gateway(GatewayError),
    /// Storage failure
    #[display("{}", _0)]
    Database(DatabaseError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Generic backend error
    #[display("{}", _0)]
    Backend(BackendError),
}

/// Huntcraft error with kind discrimination.
///
/// # Examples
///
/// ```
/// use huntcraft_error::{HuntcraftError, HuntcraftErrorKind, StoryError, StoryErrorKind};
///
/// let err: HuntcraftError = StoryError::new(StoryErrorKind::NoLocations).into();
/// assert!(matches!(err.kind(), HuntcraftErrorKind::Story(_)));
/// ```
#[derive(Debug, derive_more::Display)]
#[display("Huntcraft Error: {}", _0)]
pub struct HuntcraftError(Box<HuntcraftErrorKind>);

impl HuntcraftError {
    /// Create a new error from a kind.
    pub fn new(kind: HuntcraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HuntcraftErrorKind {
        &self.0
    }

    /// The story error inside, if this is one.
    pub fn as_story(&self) -> Option<&StoryError> {
        match self.kind() {
            HuntcraftErrorKind::Story(e) => Some(e),
            _ => None,
        }
    }

    /// The gateway error inside, if this is one.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self.kind() {
            HuntcraftErrorKind::Gateway(e) => Some(e),
            _ => None,
        }
    }

    /// Severity for reporting; only story errors can be critical.
    pub fn severity(&self) -> Severity {
        self.as_story()
            .map(StoryError::severity)
            .unwrap_or(Severity::Error)
    }
}

impl std::error::Error for HuntcraftError {}

// Generic From implementation for any type that converts to HuntcraftErrorKind
impl<T> From<T> for HuntcraftError
where
    T: Into<HuntcraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

#[cfg(feature = "database")]
impl From<diesel::result::Error> for HuntcraftErrorKind {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        HuntcraftErrorKind::Database(DatabaseError::from(err))
    }
}

/// Result type for Huntcraft operations.
pub type HuntcraftResult<T> = std::result::Result<T, HuntcraftError>;
