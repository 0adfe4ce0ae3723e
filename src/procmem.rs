//! Reads through `/proc/<pid>/mem`, for kernels without `process_vm_readv(2)`.
//!
//! `open(2)`, `pread(2)`, and `close(2)` are all async-signal-safe. The path is formatted
//! into a stack buffer, never a `String`.

use std::convert::TryFrom;
use std::ffi::CStr;

use nix::{
    errno::Errno,
    fcntl::{self, OFlag},
    sys::{stat::Mode, uio},
    unistd::{self, Pid},
};

use crate::address::Address;
use crate::error::{Error, Result};

// "/proc/" + up to 10 pid digits + "/mem" + NUL.
const PATH_CAPACITY: usize = 32;

/// NUL-terminated `/proc/<pid>/mem` path, stored inline.
pub(crate) struct ProcMemPath {
    buf: [u8; PATH_CAPACITY],
    len: usize,
}

impl ProcMemPath {
    pub(crate) fn new(pid: Pid) -> Self {
        let mut path = Self { buf: [0; PATH_CAPACITY], len: 0 };

        path.push(b"/proc/");
        path.push_decimal(pid.as_raw() as u32);
        path.push(b"/mem\0");

        path
    }

    fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if let Some(slot) = self.buf.get_mut(self.len) {
                *slot = b;
                self.len += 1;
            }
        }
    }

    fn push_decimal(&mut self, mut n: u32) {
        // u32::MAX has 10 digits.
        let mut digits = [0u8; 10];
        let mut count = 0;

        loop {
            digits[count] = b'0' + (n % 10) as u8;
            count += 1;
            n /= 10;

            if n == 0 {
                break;
            }
        }

        for i in (0..count).rev() {
            let d = digits[i];
            self.push(&[d]);
        }
    }

    pub(crate) fn as_cstr(&self) -> Result<&CStr> {
        CStr::from_bytes_with_nul(&self.buf[..self.len]).map_err(|_| Error::invalid())
    }
}

/// Read exactly `dst.len()` bytes at `addr` of `pid` via a single `pread(2)`.
pub(crate) fn read(pid: Pid, addr: Address, dst: &mut [u8]) -> Result<()> {
    let len = dst.len();

    // `pread` takes a signed offset, so the upper half of the address space is unreachable.
    let offset = match libc::off_t::try_from(addr) {
        Ok(offset) => offset,
        Err(_) => return Err(Error::unreadable(addr, len)),
    };

    let path = ProcMemPath::new(pid);
    let fd = fcntl::open(path.as_cstr()?, OFlag::O_RDONLY | OFlag::O_CLOEXEC, Mode::empty())
        .map_err(|errno| match errno {
            Errno::ENOENT => Error::Failure { source: Errno::ESRCH },
            errno => Error::from_read(addr, len, errno),
        })?;

    let res = uio::pread(fd, dst, offset);

    // Nothing useful can be done if closing a read-only descriptor fails.
    let _ = unistd::close(fd);

    match res {
        Ok(n) if n == len => Ok(()),
        Ok(_) => Err(Error::unreadable(addr, len)),
        Err(errno) => Err(Error::from_read(addr, len, errno)),
    }
}
