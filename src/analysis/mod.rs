//! Walking pointer chains over a region catalog.
//!
//! `memory` provides the `MemoryView`/`PointerReader` read primitives,
//! `code` the `CodeResolver` that describes executable addresses, and
//! `walker` the chain-following algorithm built on both.

pub mod code;
pub mod memory;
pub mod walker;
