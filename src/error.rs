use nix::errno::Errno;

use crate::address::Address;


pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a failed memory access or primitive.
///
/// Every variant is `Copy` and built without allocation, so errors can be created and
/// inspected from inside a signal handler.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("Unreadable memory: {len} bytes at {addr:#x}")]
    Unreadable {
        addr: Address,
        len: usize,
        source: Errno,
    },

    #[error("Operation failed")]
    Failure {
        source: Errno,
    },
}

impl Error {
    /// Classify an errno returned by a memory transfer of `len` bytes at `addr`.
    pub(crate) fn from_read(addr: Address, len: usize, errno: Errno) -> Self {
        match errno {
            Errno::EFAULT | Errno::EIO | Errno::EACCES | Errno::EPERM | Errno::ENOMEM =>
                Error::Unreadable { addr, len, source: errno },
            _ =>
                Error::Failure { source: errno },
        }
    }

    pub(crate) fn unreadable(addr: Address, len: usize) -> Self {
        Error::Unreadable { addr, len, source: Errno::EFAULT }
    }

    pub(crate) fn invalid() -> Self {
        Error::Failure { source: Errno::EINVAL }
    }

    /// True if the target range could not be read.
    ///
    /// Callers collecting a report typically treat such a field as absent.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Error::Unreadable { .. })
    }

    pub fn errno(&self) -> Errno {
        match self {
            Error::Unreadable { source, .. } => *source,
            Error::Failure { source } => *source,
        }
    }
}
