//! Story protocol error types.

/// How urgently a story failure needs a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Severity {
    /// Rejected before anything was written; safe to retry.
    #[display("error")]
    Error,
    /// Stored state may be inconsistent; needs investigation.
    #[display("critical")]
    Critical,
}

/// Specific error conditions for story assembly and selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoryErrorKind {
    /// Generated text could not be read as the expected payload
    MalformedPayload(String),
    /// Template blanks do not match the number of locations
    BlankCountMismatch {
        /// Number of locations passed to generation
        expected: usize,
        /// Distinct blanks found in the template
        found: usize,
    },
    /// Payload locations and input locations disagree
    UnmappedLocation {
        /// Input locations with no payload entry
        missing: Vec<String>,
        /// Payload entries for locations outside the input set
        unexpected: Vec<String>,
    },
    /// Requested option does not exist for the location
    UnknownOption {
        /// Location the selection targeted
        location_id: String,
        /// Requested option number
        option_number: i32,
    },
    /// Option replacement failed partway through a generation write
    PartialPersistenceFailure {
        /// Replacement step that failed
        step: String,
        /// Location being written, if known
        location_id: Option<String>,
        /// Option being written, if known
        option_number: Option<i32>,
        /// Underlying store message
        message: String,
        /// Whether the store undid the story upsert as well
        rolled_back: bool,
    },
    /// Hunt has no location stops to generate for
    NoLocations,
    /// Theme or tone missing from a generation request
    MissingThemeOrTone,
    /// Hunt does not exist
    HuntNotFound(String),
    /// Location stop does not exist
    LocationNotFound(String),
}

impl std::fmt::Display for StoryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryErrorKind::MalformedPayload(msg) => write!(f, "Malformed story payload: {}", msg),
            StoryErrorKind::BlankCountMismatch { expected, found } => write!(
                f,
                "Template has {} distinct blank(s) but {} location(s) were supplied",
                found, expected
            ),
            StoryErrorKind::UnmappedLocation {
                missing,
                unexpected,
            } => write!(
                f,
                "Unmapped locations: missing from payload [{}], not in hunt [{}]",
                missing.join(", "),
                unexpected.join(", ")
            ),
            StoryErrorKind::UnknownOption {
                location_id,
                option_number,
            } => write!(
                f,
                "Option {} does not exist for location {}",
                option_number, location_id
            ),
            StoryErrorKind::PartialPersistenceFailure {
                step,
                location_id,
                option_number,
                message,
                rolled_back,
            } => {
                write!(f, "Option replacement failed during {}", step)?;
                if let Some(location_id) = location_id {
                    write!(f, " (location {}", location_id)?;
                    if let Some(option_number) = option_number {
                        write!(f, ", option {}", option_number)?;
                    }
                    write!(f, ")")?;
                }
                if *rolled_back {
                    write!(f, ", rolled back: {}", message)
                } else {
                    write!(f, ", story left without its options: {}", message)
                }
            }
            StoryErrorKind::NoLocations => write!(
                f,
                "Hunt has no location stops; add locations before generating a story"
            ),
            StoryErrorKind::MissingThemeOrTone => {
                write!(f, "Both theme and tone are required to generate a story")
            }
            StoryErrorKind::HuntNotFound(id) => write!(f, "Hunt {} not found", id),
            StoryErrorKind::LocationNotFound(id) => write!(f, "Location {} not found", id),
        }
    }
}

impl StoryErrorKind {
    /// Severity of this condition.
    pub fn severity(&self) -> Severity {
        match self {
            StoryErrorKind::PartialPersistenceFailure {
                rolled_back: false,
                ..
            } => Severity::Critical,
            _ => Severity::Error,
        }
    }
}

/// Error type for story operations.
///
/// # Examples
///
/// ```
/// use huntcraft_error::{Severity, StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::BlankCountMismatch { expected: 3, found: 2 });
/// assert!(format!("{}", err).contains("2 distinct blank"));
/// assert_eq!(err.severity(), Severity::Error);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a malformed-payload error.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::MalformedPayload(message.into()))
    }

    /// Severity of the underlying condition.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
