//! Address values and overflow-checked address arithmetic.

/// A location in some process's address space.
pub type Address = usize;

/// Signed displacement applied to an [`Address`].
pub type Offset = isize;

/// Highest representable address.
pub const ADDRESS_MAX: Address = Address::MAX;

/// Apply a signed `offset` to `base`.
///
/// Returns `None` if the result would fall outside `[0, ADDRESS_MAX]`, so a dependent read
/// can never be issued against a wrapped-around address.
pub fn apply_offset(base: Address, offset: Offset) -> Option<Address> {
    if offset >= 0 {
        base.checked_add(offset as Address)
    } else {
        // `unsigned_abs` is exact even for `Offset::MIN`.
        base.checked_sub(offset.unsigned_abs())
    }
}

/// Address of the last byte of a `len`-byte range starting at `base`.
///
/// `None` for an empty range or one that runs past [`ADDRESS_MAX`].
pub(crate) fn last_byte(base: Address, len: usize) -> Option<Address> {
    len.checked_sub(1).and_then(|n| base.checked_add(n))
}
