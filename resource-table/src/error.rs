use std::fmt;

use memory::MemoryError;

use crate::TableKind;

#[derive(Debug, PartialEq)]
pub enum ResourceError {
    /// The backing allocation could not be satisfied.
    OutOfMemory,
    /// Release or swap-out on an entry without a primary block.
    NotResident,
    /// Swap-in or discard on an entry without a secondary block.
    NotSwapped,
    InvalidId(u32),
    AlreadyResident(u32),
    InvalidSize { expected: usize, got: usize },
    OutOfBounds,
    Unsupported(TableKind),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::OutOfMemory => write!(f, "out of memory"),
            ResourceError::NotResident => write!(f, "entry is not resident"),
            ResourceError::NotSwapped => write!(f, "entry has no swap copy"),
            ResourceError::InvalidId(id) => write!(f, "invalid entry id {}", id),
            ResourceError::AlreadyResident(id) => write!(f, "entry {} is already resident", id),
            ResourceError::InvalidSize { expected, got } => {
                write!(f, "invalid size {} (expected {})", got, expected)
            }
            ResourceError::OutOfBounds => write!(f, "access past the end of the block"),
            ResourceError::Unsupported(kind) => write!(f, "not supported by a {} table", kind),
        }
    }
}

impl std::error::Error for ResourceError {}

impl From<MemoryError> for ResourceError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::OutOfMemory => ResourceError::OutOfMemory,
            MemoryError::OutOfBounds => ResourceError::OutOfBounds,
            // Entries only ever hold live blocks.
            MemoryError::UnknownBlock => ResourceError::NotResident,
        }
    }
}
