//! Error signals raised by a parse call.

/// Every way a parse call can stop early.
///
/// `Help` is not a failure: it reports that a help flag was matched and the
/// rest of the input was left alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input that does not fit the declared structure.
    #[error("{0}")]
    Parse(String),
    /// All input was consumed but the group constraints do not hold.
    #[error("{0}")]
    Validation(String),
    /// A mapping-backed argument received a key it does not know.
    #[error("{0}")]
    Map(String),
    /// A single-match argument was matched more than once.
    #[error("{0}")]
    Extra(String),
    /// A help flag was matched. Carries the flag text as written.
    #[error("help requested: {0}")]
    Help(String),
}

/// Payload-free view of [`Error`] for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Validation,
    Map,
    Extra,
    Help,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Map(_) => ErrorKind::Map,
            Self::Extra(_) => ErrorKind::Extra,
            Self::Help(_) => ErrorKind::Help,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Parse(msg)
            | Self::Validation(msg)
            | Self::Map(msg)
            | Self::Extra(msg)
            | Self::Help(msg) => msg.as_str(),
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
