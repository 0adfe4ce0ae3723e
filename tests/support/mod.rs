#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{ensure, Result};
use nix::{
    sys::{signal::{kill, Signal}, wait::waitpid},
    unistd::{close, fork, pause, pipe, read, write, ForkResult, Pid},
};

/// Value published by a forked child at a known address.
///
/// The child inherits the parent's layout, so `&PUBLISHED` names the same address in both.
pub static PUBLISHED: AtomicU64 = AtomicU64::new(0);

/// NUL-terminated string present in every forked child.
pub static GREETING: &[u8] = b"hello from the child\0";

pub fn published_addr() -> usize {
    &PUBLISHED as *const AtomicU64 as usize
}

/// Forked child that parks until dropped.
pub struct Child {
    pid: Pid,
}

impl Child {
    /// Fork a child that stores `value` in [`PUBLISHED`], then waits to be killed.
    ///
    /// Returns once the store is visible in the child.
    pub fn publish(value: u64) -> Result<Self> {
        let (rx, tx) = pipe()?;

        match unsafe { fork()? } {
            ForkResult::Child => {
                // Only async-signal-safe calls past this point.
                PUBLISHED.store(value, Ordering::SeqCst);
                let _ = write(tx, &[1]);

                loop {
                    pause();
                }
            },
            ForkResult::Parent { child } => {
                close(tx)?;

                let mut ready = [0u8; 1];
                let n = read(rx, &mut ready)?;
                close(rx)?;

                ensure!(n == 1, "child exited before publishing");

                Ok(Self { pid: child })
            },
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        let _ = kill(self.pid, Signal::SIGKILL);
        let _ = waitpid(self.pid, None);
    }
}

/// Fork a child that exits at once, and reap it.
pub fn reaped_pid() -> Result<Pid> {
    match unsafe { fork()? } {
        ForkResult::Child => unsafe { libc::_exit(0) },
        ForkResult::Parent { child } => {
            waitpid(child, None)?;
            Ok(child)
        },
    }
}

/// Two adjacent pages, the second of which is inaccessible.
pub struct GuardedPage {
    base: *mut u8,
    page_size: usize,
}

impl GuardedPage {
    pub fn new() -> Result<Self> {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;

        let base = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                2 * page_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        ensure!(base != libc::MAP_FAILED, "mmap failed");

        let base = base as *mut u8;
        let guard = unsafe { base.add(page_size) };
        let res = unsafe { libc::mprotect(guard as *mut libc::c_void, page_size, libc::PROT_NONE) };
        ensure!(res == 0, "mprotect failed");

        Ok(Self { base, page_size })
    }

    /// Address of the first inaccessible byte.
    pub fn guard_addr(&self) -> usize {
        self.base as usize + self.page_size
    }

    /// Write `bytes` so that they end exactly at the guard page.
    pub fn place_at_end(&mut self, bytes: &[u8]) -> usize {
        let start = self.page_size - bytes.len();
        let page = unsafe { std::slice::from_raw_parts_mut(self.base, self.page_size) };
        page[start..].copy_from_slice(bytes);
        self.base as usize + start
    }
}

impl Drop for GuardedPage {
    fn drop(&mut self) {
        unsafe { libc::munmap(self.base as *mut libc::c_void, 2 * self.page_size) };
    }
}
