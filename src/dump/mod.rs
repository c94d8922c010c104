//! Debug-dump formatting for foreign values and type descriptors.
//!
//! - [`ValueFormatter`] turns a value into one level of [`PresentationNode`]
//! - [`format_type`] turns a bare descriptor into a `CType<name>` node
//! - [`Dumper`] is a text host that expands the tree and renders it

pub mod config;
pub mod ctype;
pub mod node;
pub mod render;
pub mod value;

pub use config::{ConfigError, DumpConfig, MAX_STRING_LENGTH};
pub use ctype::format_type;
pub use node::{Child, DisplayClass, DisplayValue, Dump, Entry, EntryLabel, PresentationNode};
pub use render::{Dumpable, Dumper};
pub use value::ValueFormatter;
