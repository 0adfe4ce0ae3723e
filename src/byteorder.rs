//! Byte order of multi-byte values relative to the host.

/// How a multi-byte value read from memory relates to host byte order.
///
/// Callers declare the byte order of the data they read with [`ByteOrder::little_endian()`]
/// or [`ByteOrder::big_endian()`], and the swap methods become either identity functions or
/// byte reversals, with no host-order branching at the call site.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// Data is already in host order.
    Direct,

    /// Data is in the opposite of host order.
    Swapped,
}

/// Descriptor for data already in host order.
pub const DIRECT: ByteOrder = ByteOrder::Direct;
/// Descriptor for data in the opposite of host order.
pub const SWAPPED: ByteOrder = ByteOrder::Swapped;

impl ByteOrder {
    /// Descriptor for little-endian data on this host.
    pub const fn little_endian() -> Self {
        if cfg!(target_endian = "little") {
            DIRECT
        } else {
            SWAPPED
        }
    }

    /// Descriptor for big-endian data on this host.
    pub const fn big_endian() -> Self {
        if cfg!(target_endian = "big") {
            DIRECT
        } else {
            SWAPPED
        }
    }

    /// True if the swap methods are identity functions.
    pub const fn is_direct(self) -> bool {
        matches!(self, ByteOrder::Direct)
    }

    /// Convert a 16-bit value between this order and host order.
    pub const fn swap16(self, value: u16) -> u16 {
        match self {
            ByteOrder::Direct => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }

    /// Convert a 32-bit value between this order and host order.
    pub const fn swap32(self, value: u32) -> u32 {
        match self {
            ByteOrder::Direct => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }

    /// Convert a 64-bit value between this order and host order.
    pub const fn swap64(self, value: u64) -> u64 {
        match self {
            ByteOrder::Direct => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }

    /// Swap a word-sized value, as used for pointers read out of a target.
    pub const fn swap_word(self, value: usize) -> usize {
        match self {
            ByteOrder::Direct => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }
}
