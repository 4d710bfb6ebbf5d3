use serde::{Deserialize, Serialize};

/// memsim errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// The request cannot be simulated at all: empty reference string,
    /// non-positive frame count or an unknown policy.
    #[error("{0}")]
    InvalidInput(String),
    /// The segment sizes are malformed. Only the segmentation output is lost;
    /// the page-replacement result is still returned.
    #[error("invalid segment sizes: {0}")]
    InvalidSegmentInput(String),
    /// A replacer picked a frame slot the frame set does not have.
    #[error("frame slot out of bounds")]
    OutOfBounds,
    /// A page was loaded into a frame set that already holds it.
    #[error("page {0} is already resident")]
    AlreadyResident(String),
    /// A response or page-table image could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("io error: {0}")]
    IO(String),
}

impl Error {
    /// The HTTP-equivalent status a caller should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            // Segment errors ride along with a successful simulation.
            Error::InvalidSegmentInput(_) => 200,
            Error::OutOfBounds
            | Error::AlreadyResident(_)
            | Error::Encoding(_)
            | Error::IO(_) => 500,
        }
    }

    /// Whether the error still leaves a usable page-replacement result.
    pub fn is_partial(&self) -> bool {
        matches!(self, Error::InvalidSegmentInput(_))
    }
}

/// Constructs an Error::InvalidInput for the given format string.
#[macro_export]
macro_rules! errinput {
    ($($args:tt)*) => { $crate::Error::InvalidInput(format!($($args)*)).into() };
}

/// Constructs an Error::InvalidSegmentInput for the given format string.
#[macro_export]
macro_rules! errsegment {
    ($($args:tt)*) => { $crate::Error::InvalidSegmentInput(format!($($args)*)).into() };
}

/// A memsim Result returning Error.
pub type Result<T> = std::result::Result<T, Error>;

impl<T> From<Error> for Result<T> {
    fn from(error: Error) -> Self {
        Err(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err.to_string())
    }
}
