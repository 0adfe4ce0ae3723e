//! Reading bytes and typed values out of a process's address space.
//!
//! Every read here is safe to issue from a signal handler. A bad address, local or remote,
//! is reported as [`Error::Unreadable`] by the kernel instead of raising `SIGSEGV`: the
//! transfer goes through `process_vm_readv(2)` even when the target is the calling process.

use std::io::IoSliceMut;
use std::mem;

use nix::{
    errno::Errno,
    sys::uio::{self, RemoteIoVec},
    unistd::{self, Pid},
};
use tracing::debug;

use crate::address::{self, Address, Offset};
use crate::byteorder::ByteOrder;
use crate::error::{Error, Result};
use crate::procmem;

/// Smallest page size of any supported target.
///
/// String reads are split at multiples of this so that a string ending just short of an
/// unmapped page never needs a transfer that touches that page.
const PAGE_SIZE: usize = 4096;

/// Handle to the address space of a process.
///
/// A `Task` is a plain value: it owns no descriptor and holds no lock, so it can be built
/// ahead of time and copied into a signal handler.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Task {
    pid: Pid,

    /// Retry through `/proc/<pid>/mem` if `process_vm_readv(2)` is not implemented.
    ///
    /// Defaults to `true`.
    proc_mem_fallback: bool,
}

impl Task {
    /// Address space of the calling process.
    pub fn current() -> Self {
        Self::new(unistd::getpid())
    }

    /// Address space of another process.
    ///
    /// Reading it requires ptrace access, as for `PTRACE_ATTACH`.
    ///
    /// This logs through `tracing`, so call it before any signal handler runs and copy the
    /// resulting `Task` into the handler.
    pub fn from_pid(pid: Pid) -> Self {
        debug!(pid = pid.as_raw(), "inspecting task");
        Self::new(pid)
    }

    fn new(pid: Pid) -> Self {
        let proc_mem_fallback = true;

        Self { pid, proc_mem_fallback }
    }

    /// Set the value of the `proc_mem_fallback` flag.
    pub fn proc_mem_fallback(mut self, enabled: bool) -> Self {
        self.proc_mem_fallback = enabled;
        self
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Copy exactly `dst.len()` bytes starting at `addr` into `dst`.
    ///
    /// On failure the contents of `dst` are unspecified. A range that only partly maps is
    /// unreadable; the transfer is issued once and never resumed.
    pub fn read_bytes(&self, addr: Address, dst: &mut [u8]) -> Result<()> {
        let len = dst.len();

        if len == 0 {
            return Ok(());
        }

        if address::last_byte(addr, len).is_none() {
            return Err(Error::unreadable(addr, len));
        }

        let res = {
            let mut local = [IoSliceMut::new(&mut *dst)];
            let remote = [RemoteIoVec { base: addr, len }];

            uio::process_vm_readv(self.pid, &mut local, &remote)
        };

        match res {
            Ok(n) if n == len =>
                Ok(()),
            Ok(_) =>
                Err(Error::unreadable(addr, len)),
            Err(errno) if self.use_fallback(errno) =>
                procmem::read(self.pid, addr, dst),
            Err(errno) =>
                Err(Error::from_read(addr, len, errno)),
        }
    }

    pub fn read_u8(&self, base: Address, offset: Offset) -> Result<u8> {
        self.read_word(base, offset)
    }

    pub fn read_u16(&self, order: ByteOrder, base: Address, offset: Offset) -> Result<u16> {
        Ok(order.swap16(self.read_word(base, offset)?))
    }

    pub fn read_u32(&self, order: ByteOrder, base: Address, offset: Offset) -> Result<u32> {
        Ok(order.swap32(self.read_word(base, offset)?))
    }

    pub fn read_u64(&self, order: ByteOrder, base: Address, offset: Offset) -> Result<u64> {
        Ok(order.swap64(self.read_word(base, offset)?))
    }

    /// Read a pointer-sized value, such as a saved frame pointer or return address.
    pub fn read_address(&self, order: ByteOrder, base: Address, offset: Offset) -> Result<Address> {
        Ok(order.swap_word(self.read_word(base, offset)?))
    }

    /// Read a NUL-terminated string at `addr` into `buf`, returning its length.
    ///
    /// The copy in `buf` is always NUL-terminated. A string that does not fit is truncated
    /// to `buf.len() - 1` bytes.
    pub fn read_cstr(&self, addr: Address, buf: &mut [u8]) -> Result<usize> {
        let capacity = buf.len().checked_sub(1).ok_or_else(Error::invalid)?;
        let mut read = 0;

        while read < capacity {
            let chunk_addr = addr
                .checked_add(read)
                .ok_or_else(|| Error::unreadable(addr, read + 1))?;
            let to_page_end = PAGE_SIZE - chunk_addr % PAGE_SIZE;
            let chunk_len = to_page_end.min(capacity - read);

            let chunk = &mut buf[read..read + chunk_len];
            self.read_bytes(chunk_addr, chunk)?;

            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                return Ok(read + nul);
            }

            read += chunk_len;
        }

        buf[capacity] = 0;

        Ok(capacity)
    }

    // Whether a failed `process_vm_readv(2)` should be retried through procfs.
    fn use_fallback(&self, errno: Errno) -> bool {
        self.proc_mem_fallback && errno == Errno::ENOSYS
    }

    // Read `size_of::<W>()` bytes at `base + offset`, in host layout.
    fn read_word<W: Word>(&self, base: Address, offset: Offset) -> Result<W> {
        let addr = address::apply_offset(base, offset).ok_or(Error::Unreadable {
            addr: base,
            len: mem::size_of::<W>(),
            source: Errno::EOVERFLOW,
        })?;

        let mut scratch = W::Bytes::default();
        self.read_bytes(addr, scratch.as_mut())?;

        Ok(W::from_ne(scratch))
    }
}

/// Read `dst.len()` bytes at `addr` of the calling process.
///
/// An invalid `addr` fails with [`Error::Unreadable`] rather than faulting.
pub fn read_bytes_from_self(addr: Address, dst: &mut [u8]) -> Result<()> {
    Task::current().read_bytes(addr, dst)
}

/// Fixed-width integer that can be read out of a target.
trait Word: Sized {
    type Bytes: Default + AsMut<[u8]>;

    fn from_ne(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_word {
    ($($ty: ty),*) => {
        $(
            impl Word for $ty {
                type Bytes = [u8; mem::size_of::<$ty>()];

                fn from_ne(bytes: Self::Bytes) -> Self {
                    <$ty>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64, usize);
