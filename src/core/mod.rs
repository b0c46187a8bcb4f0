//! Core data types for pointer chain inspection.
//!
//! Regions and their permissions, the frozen region catalog of a session,
//! and the chains the walker produces.

pub mod catalog;
pub mod chain;
pub mod code_location;
pub mod disassembler;
pub mod perms;
pub mod region;
