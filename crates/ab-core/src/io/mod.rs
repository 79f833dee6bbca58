//! File I/O for the persisted launch configuration
//!
//! - **Atomic replace**: temp file in the same directory, fsync, rename
//! - **No silent recovery**: unparsable input is reported, never overwritten

pub mod atomic;
pub mod error;

pub use atomic::atomic_write;
pub use error::DocumentError;
