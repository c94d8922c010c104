//! Debug-dump formatting for values that live in foreign (C) memory.
//!
//! `ffi` models the runtime side (type descriptors and foreign memory), `dump` holds the
//! type-directed formatter plus a reference host that renders presentation trees as text.

pub mod dump;
pub mod ffi;
pub mod logging;

pub use dump::{
    Child, DisplayClass, DisplayValue, Dump, DumpConfig, Dumpable, Dumper, Entry, EntryLabel,
    PresentationNode, ValueFormatter, format_type,
};
pub use ffi::memory::{ForeignMemory, ForeignValue, Loaded, MemoryImage};
pub use ffi::types::{TypeArena, TypeBuilder, TypeId};
