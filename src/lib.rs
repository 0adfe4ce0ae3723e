//! Async-signal-safe primitives for reading a (possibly crashed) process's memory.

pub mod address;
pub mod byteorder;
pub mod error;
mod procmem;
pub mod string;
pub mod task;

pub use address::{apply_offset, Address, Offset, ADDRESS_MAX};
pub use byteorder::ByteOrder;
pub use error::{Error, Result};
pub use nix::unistd::Pid;
pub use task::{read_bytes_from_self, Task};
