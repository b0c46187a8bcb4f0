//! Live process access through procfs.
//!
//! Attaching checks that the target has an active execution context; the
//! region listing and memory file are then read on demand.

pub mod mem;
pub mod target;

pub use mem::ProcMemory;
pub use target::ProcessTarget;
