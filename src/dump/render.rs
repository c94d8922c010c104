//! Text rendering host for presentation trees.
//!
//! `Dumper` plays the role of an interactive debugger's dumper: it asks the formatters for one
//! level at a time and decides how far to expand the `Child::Value` handles they return.

use std::fmt::{self, Write};

use tracing::warn;

use crate::ffi::memory::{ForeignValue, Loaded};
use crate::ffi::types::{CScalar, TypeArena, TypeId, fmt::format_hex};

use super::config::DumpConfig;
use super::ctype::format_type;
use super::node::{Child, DisplayClass, DisplayValue, Dump, PresentationNode};
use super::value::ValueFormatter;

pub const DEFAULT_MAX_DEPTH: usize = 16;
const INDENT: &str = "  ";
const ELLIPSIS: &str = "…";

/// The two categories of object the dumper knows how to format.
#[derive(Clone, Copy, Debug)]
pub enum Dumpable<'a> {
    /// A bare type descriptor.
    Type { arena: &'a TypeArena, ty: TypeId },
    /// A value of some type.
    Value(ForeignValue<'a>),
}

impl<'a> From<ForeignValue<'a>> for Dumpable<'a> {
    fn from(value: ForeignValue<'a>) -> Self {
        Dumpable::Value(value)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Dumper {
    formatter: ValueFormatter,
    max_depth: usize,
}

impl Default for Dumper {
    fn default() -> Self {
        Self::new(DumpConfig::default())
    }
}

impl Dumper {
    pub fn new(config: DumpConfig) -> Self {
        Self {
            formatter: ValueFormatter::new(config),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Nesting level past which values render as `…`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn dump<'a>(&self, item: impl Into<Dumpable<'a>>) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out, item);
        out
    }

    pub fn write_to<'a, W: Write>(
        &self,
        out: &mut W,
        item: impl Into<Dumpable<'a>>,
    ) -> fmt::Result {
        match item.into() {
            Dumpable::Type { arena, ty } => self.write_node(out, &format_type(arena, ty), 0),
            Dumpable::Value(value) => self.write_dump(out, self.formatter.format_value(value), 0),
        }
    }

    fn write_dump<W: Write>(&self, out: &mut W, dump: Dump<'_>, depth: usize) -> fmt::Result {
        match dump {
            Dump::Node(node) => self.write_node(out, &node, depth),
            Dump::Generic(value) => write_generic(out, value),
        }
    }

    fn write_node<W: Write>(
        &self,
        out: &mut W,
        node: &PresentationNode<'_>,
        depth: usize,
    ) -> fmt::Result {
        match (&node.display, node.class) {
            (Some(DisplayValue::Null), _) => return out.write_str("null"),
            (Some(DisplayValue::Bytes(bytes)), _) => return write_binary(out, bytes),
            (Some(DisplayValue::Array { element }), DisplayClass::Length(count)) => {
                write!(out, "array:{element}[{count}] [")?;
                self.write_entries(out, node, depth, " => ")?;
                return out.write_char(']');
            }
            _ => {}
        }
        write!(out, "{} {{", node.header)?;
        self.write_entries(out, node, depth, ": ")?;
        out.write_char('}')
    }

    fn write_entries<W: Write>(
        &self,
        out: &mut W,
        node: &PresentationNode<'_>,
        depth: usize,
        separator: &str,
    ) -> fmt::Result {
        if node.entries.is_empty() {
            return Ok(());
        }
        out.write_char('\n')?;
        for entry in &node.entries {
            write_indent(out, depth + 1)?;
            write!(out, "{}{separator}", entry.label)?;
            self.write_child(out, &entry.child, depth + 1)?;
            out.write_char('\n')?;
        }
        write_indent(out, depth)
    }

    fn write_child<W: Write>(&self, out: &mut W, child: &Child<'_>, depth: usize) -> fmt::Result {
        match child {
            Child::Scalar(scalar) => write_scalar(out, scalar),
            Child::Node(node) => self.write_node(out, node, depth),
            Child::Value(value) => match value.load() {
                Ok(Loaded::Scalar(scalar)) => write_scalar(out, &scalar),
                Ok(Loaded::Null) => out.write_str("null"),
                Ok(Loaded::Data(_)) if depth >= self.max_depth => out.write_str(ELLIPSIS),
                Ok(Loaded::Data(data)) => {
                    self.write_dump(out, self.formatter.format_value(data), depth)
                }
                Err(err) => {
                    warn!(ty = %value.type_name(), error = %err, "could not load child value");
                    write_generic(out, *value)
                }
            },
        }
    }
}

fn write_indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_generic<W: Write>(out: &mut W, value: ForeignValue<'_>) -> fmt::Result {
    write!(out, "{} @{}", value.type_name(), format_hex(value.address(), 0))
}

fn write_scalar<W: Write>(out: &mut W, scalar: &CScalar) -> fmt::Result {
    match scalar {
        CScalar::Unsigned(value) => write!(out, "{value}"),
        CScalar::Signed(value) => write!(out, "{value}"),
        // Debug keeps a fractional part on whole numbers: `0.0`, `42.0`
        CScalar::F32(value) => write!(out, "{value:?}"),
        CScalar::F64(value) => write!(out, "{value:?}"),
        CScalar::Bool(value) => write!(out, "{value}"),
        CScalar::Char(byte) => {
            out.write_char('"')?;
            write_escaped(out, *byte)?;
            out.write_char('"')
        }
        CScalar::Enum { value, .. } => write!(out, "{value}"),
        CScalar::Address(address) => out.write_str(&format_hex(*address, 0)),
    }
}

fn write_binary<W: Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    out.write_str("b\"")?;
    for byte in bytes {
        write_escaped(out, *byte)?;
    }
    out.write_char('"')
}

fn write_escaped<W: Write>(out: &mut W, byte: u8) -> fmt::Result {
    match byte {
        b'"' => out.write_str("\\\""),
        b'\\' => out.write_str("\\\\"),
        0x20..=0x7E => out.write_char(byte as char),
        _ => write!(out, "\\x{byte:02X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_scalar(scalar: CScalar) -> String {
        let mut out = String::new();
        write_scalar(&mut out, &scalar).unwrap();
        out
    }

    #[test]
    fn floats_keep_a_fractional_part() {
        assert_eq!(render_scalar(CScalar::F32(0.0)), "0.0");
        assert_eq!(render_scalar(CScalar::F32(42.0)), "42.0");
        assert_eq!(render_scalar(CScalar::F64(42.2)), "42.2");
    }

    #[test]
    fn chars_and_bytes_escape_non_printables() {
        assert_eq!(render_scalar(CScalar::Char(0)), r#""\x00""#);
        assert_eq!(render_scalar(CScalar::Char(b'H')), r#""H""#);
        let mut out = String::new();
        write_binary(&mut out, b"a\"b\\\x7F").unwrap();
        assert_eq!(out, r#"b"a\"b\\\x7F""#);
    }

    #[test]
    fn enums_render_their_numeric_value() {
        let scalar = CScalar::Enum {
            label: Some("Ready".into()),
            value: 1,
        };
        assert_eq!(render_scalar(scalar), "1");
    }

    #[test]
    fn empty_nodes_render_braces() {
        let dumper = Dumper::default();
        let mut out = String::new();
        dumper
            .write_node(&mut out, &PresentationNode::new("CType<void>"), 0)
            .unwrap();
        assert_eq!(out, "CType<void> {}");
    }
}
