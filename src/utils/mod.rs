//! # General Utilities
//!
//! Graph algorithms shared by the analyses, written against the [cfg::CfgNode]
//! and [cfg::CfgRegion] traits so they do not depend on the IR entities.

pub mod cfg;
pub mod dfs;
