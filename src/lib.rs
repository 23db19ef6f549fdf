//! Dead store elimination on a small arena-based IR.
//!
//! - [collections]: arenas and intrusive linked lists backing the IR.
//! - [ir]: functions, blocks, instructions and memory slots, the pass
//!   interfaces, and the passes themselves.
//! - [utils]: control flow graph traversal.

#![forbid(unsafe_code)]
#![warn(clippy::wildcard_enum_match_arm)]

pub mod collections;
pub mod ir;
pub mod utils;
