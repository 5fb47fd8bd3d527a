//! Output generation.
//!
//! - [`json`]: writes the merged review list as a single JSON array

pub mod json;
