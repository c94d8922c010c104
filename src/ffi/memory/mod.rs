//! Read access to foreign memory, interpreted through `ffi::types` descriptors.

pub mod endianness;
pub mod error;
pub mod image;
pub mod string;
pub mod value;

pub use endianness::Endianness;
pub use error::{MemoryError, MemoryResult};
pub use image::{ForeignMemory, MemoryImage};
pub use string::{CStringScan, scan_c_string};
pub use value::{Fields, ForeignValue, Loaded};
