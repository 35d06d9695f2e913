use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

/// Errors raised at the collaborator boundary: DSL translation, posting-list persistence, and the
/// file-descriptor cache. The core iterator algebra itself never fails and never constructs one
/// of these; an unrecognized DSL node kind is rejected earlier still, as a `serde_json` error
/// during deserialization, before translation ever sees it.
#[derive(Debug)]
pub enum QueryError {
    /// A `dis_max` node in the DSL carried a tiebreaker outside `[0, 1]`.
    InvalidTieBreaker(f32),

    /// An `and_not` node in the DSL carried zero excluders.
    EmptyAndNotExcluders,

    /// A posting list loaded from disk was not strictly ascending, violating the invariant the
    /// core assumes every posting list satisfies.
    CorruptPostingList {
        path: PathBuf,
        at: usize,
    },

    /// The file-descriptor cache's factory failed to open a file.
    FdCacheOpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A posting-store read, write, or directory-creation call failed.
    PersistenceIoFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidTieBreaker(value) => write!(f, "dis_max tiebreaker {value} is not in [0, 1]"),
            Self::EmptyAndNotExcluders => write!(f, "and_not requires at least one excluder"),
            Self::CorruptPostingList {
                path,
                at,
            } => write!(f, "posting list at {} is not strictly ascending at index {at}", path.display()),
            Self::FdCacheOpenFailed {
                path,
                source,
            } => write!(f, "failed to open {}: {source}", path.display()),
            Self::PersistenceIoFailed {
                path,
                source,
            } => write!(f, "posting store I/O failed for {}: {source}", path.display()),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FdCacheOpenFailed {
                source,
                ..
            }
            | Self::PersistenceIoFailed {
                source,
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// A type alias for any kind of error, boxed so it can be composed with errors from other crates
/// at a boundary.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A type alias for a `Result` with a [`BoxError`].
pub type BoxResult<T> = Result<T, BoxError>;
