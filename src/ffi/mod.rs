//! Runtime-side model: C type descriptors and the foreign memory they describe.

pub mod memory;
pub mod types;
