use thiserror::Error;

/// Failures raised by the bounded containers themselves. Under a well-formed setup script
/// and validated moves these never happen, so callers treat them as fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    #[error("container is already holding its capacity of {capacity}")]
    CapacityExceeded { capacity: usize },
    #[error("container is empty")]
    EmptyContainer,
}

/// Reasons a requested move is illegal. These are ordinary outcomes of play.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("there is no flask {index}")]
    NoSuchFlask { index: usize },
    #[error("cannot pour into the same flask")]
    SameFlask,
    #[error("cannot pour from flask {index}")]
    SourceInvalid { index: usize },
    #[error("cannot pour into flask {index}")]
    DestinationInvalid { index: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    #[error(transparent)]
    Illegal(#[from] MoveError),
    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl TransferError {
    /// Whether the player can simply try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Illegal(_))
    }
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("malformed directive on script line {line}: {reason}")]
    MalformedDirective { line: usize, reason: String },
    #[error("malformed setup header {header:?}")]
    MalformedHeader { header: String },
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("could not read setup data")]
    Io(#[from] std::io::Error),
}
