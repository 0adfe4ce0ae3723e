//! Async-signal-safe replacements for `<string.h>` routines.
//!
//! Nothing here takes a lock, consults locale state, or allocates. Accesses are volatile so
//! the loops are never lowered into calls to the platform C library, which may not be
//! safe to enter from the interrupted context.
//!
//! The slice forms treat the end of a slice as a NUL terminator and never index outside
//! either operand. The raw-pointer forms follow C semantics, for pointers taken out of a
//! crashed context.

use std::cmp::Ordering;
use std::ptr;

use libc::{c_char, c_int};

use crate::error::{Error, Result};

/// Number of bytes before the first NUL in `s`, or `s.len()` if there is none.
pub fn length(s: &[u8]) -> usize {
    let mut n = 0;

    while n < s.len() && load(s, n) != 0 {
        n += 1;
    }

    n
}

/// Three-way comparison of two NUL-terminated byte strings, byte-wise and unsigned.
///
/// A strict prefix compares less than the longer string.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    compare_bounded(a, b, usize::MAX)
}

/// As [`compare()`], but examining at most `max_count` bytes of each string.
pub fn compare_bounded(a: &[u8], b: &[u8], max_count: usize) -> Ordering {
    let mut i = 0;

    while i < max_count {
        let ca = if i < a.len() { load(a, i) } else { 0 };
        let cb = if i < b.len() { load(b, i) } else { 0 };

        if ca != cb {
            return ca.cmp(&cb);
        }

        if ca == 0 {
            break;
        }

        i += 1;
    }

    Ordering::Equal
}

/// Copy the first `len` bytes of `src` into `dst`.
///
/// Fails without writing anything if either operand is shorter than `len`.
pub fn copy(dst: &mut [u8], src: &[u8], len: usize) -> Result<()> {
    if dst.len() < len || src.len() < len {
        return Err(Error::invalid());
    }

    // SAFETY: both operands were checked to hold `len` bytes, and `&mut` excludes overlap.
    unsafe { memcpy(dst.as_mut_ptr(), src.as_ptr(), len) };

    Ok(())
}

/// Set the first `len` bytes of `dst` to `value`.
///
/// Fails without writing anything if `dst` is shorter than `len`.
pub fn fill(dst: &mut [u8], value: u8, len: usize) -> Result<()> {
    if dst.len() < len {
        return Err(Error::invalid());
    }

    // SAFETY: `dst` was checked to hold `len` bytes.
    unsafe { memset(dst.as_mut_ptr(), value, len) };

    Ok(())
}

#[inline(always)]
fn load(s: &[u8], i: usize) -> u8 {
    // SAFETY: every caller bounds-checks `i` first.
    unsafe { ptr::read_volatile(s.as_ptr().add(i)) }
}

/// Length of the NUL-terminated string at `s`.
///
/// # Safety
///
/// `s` must point to a readable, NUL-terminated string.
pub unsafe fn strlen(s: *const c_char) -> usize {
    let mut n = 0;

    while ptr::read_volatile(s.add(n)) != 0 {
        n += 1;
    }

    n
}

/// C `strcmp(3)`: negative, zero, or positive as `a` sorts before, with, or after `b`.
///
/// # Safety
///
/// Both pointers must reference readable, NUL-terminated strings.
pub unsafe fn strcmp(a: *const c_char, b: *const c_char) -> c_int {
    strncmp(a, b, usize::MAX)
}

/// C `strncmp(3)`. Reads nothing when `n` is zero.
///
/// # Safety
///
/// Both pointers must be readable up to the first NUL or `n` bytes, whichever comes first.
pub unsafe fn strncmp(a: *const c_char, b: *const c_char, n: usize) -> c_int {
    let a = a as *const u8;
    let b = b as *const u8;
    let mut i = 0;

    while i < n {
        let ca = ptr::read_volatile(a.add(i));
        let cb = ptr::read_volatile(b.add(i));

        if ca != cb {
            return c_int::from(ca) - c_int::from(cb);
        }

        if ca == 0 {
            break;
        }

        i += 1;
    }

    0
}

/// C `memcpy(3)`.
///
/// # Safety
///
/// `dst` must be writable and `src` readable for `n` bytes, and the regions must not
/// overlap.
pub unsafe fn memcpy(dst: *mut u8, src: *const u8, n: usize) {
    for i in 0..n {
        ptr::write_volatile(dst.add(i), ptr::read_volatile(src.add(i)));
    }
}

/// C `memset(3)`.
///
/// # Safety
///
/// `dst` must be writable for `n` bytes.
pub unsafe fn memset(dst: *mut u8, value: u8, n: usize) {
    for i in 0..n {
        ptr::write_volatile(dst.add(i), value);
    }
}
