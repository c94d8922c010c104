//! Type-directed formatting of foreign values.
//!
//! `ValueFormatter` inspects the kind of a value's descriptor and builds one level of the
//! presentation tree. Nested values are emitted as `Child::Value` handles so the host controls
//! how deep expansion goes; the formatter itself dereferences at most one pointer per call.

use tracing::{trace, warn};

use crate::ffi::memory::{ForeignValue, MemoryResult, scan_c_string};
use crate::ffi::types::{TypeKind, TypeRecord, signature, type_name};

use super::config::DumpConfig;
use super::ctype::format_type;
use super::node::{Child, DisplayClass, DisplayValue, Dump, EntryLabel, PresentationNode};

const UNSAFE_ACCESS_SUFFIX: &str = " (unsafe access)";

#[derive(Clone, Copy, Debug, Default)]
pub struct ValueFormatter {
    config: DumpConfig,
}

impl ValueFormatter {
    pub fn new(config: DumpConfig) -> Self {
        Self { config }
    }

    /// Formats one value. Never fails: a value whose memory cannot be read is handed back
    /// as `Dump::Generic`.
    pub fn format_value<'a>(&self, value: ForeignValue<'a>) -> Dump<'a> {
        match self.try_format(value) {
            Ok(dump) => dump,
            Err(err) => {
                warn!(
                    ty = %value.type_name(),
                    address = value.address(),
                    error = %err,
                    "falling back to generic display"
                );
                Dump::Generic(value)
            }
        }
    }

    fn try_format<'a>(&self, value: ForeignValue<'a>) -> MemoryResult<Dump<'a>> {
        let kind = value.kind();
        trace!(ty = %value.type_name(), address = value.address(), ?kind, "formatting value");
        let mut node = PresentationNode::new(value.type_name());
        match kind {
            TypeKind::Bool
            | TypeKind::Char
            | TypeKind::Integer { .. }
            | TypeKind::Float { .. }
            | TypeKind::Enum => {
                node.push(EntryLabel::virtual_key("cdata"), Child::Scalar(value.scalar()?));
            }
            TypeKind::Pointer => self.format_pointer(&mut node, value)?,
            TypeKind::Function => format_callable(&mut node, value),
            TypeKind::Struct | TypeKind::Union => walk_fields(&mut node, value)?,
            TypeKind::Array => format_array(&mut node, value)?,
            TypeKind::Void | TypeKind::Opaque => return Ok(Dump::Generic(value)),
        }
        Ok(Dump::Node(node))
    }

    fn format_pointer<'a>(
        &self,
        node: &mut PresentationNode<'a>,
        value: ForeignValue<'a>,
    ) -> MemoryResult<()> {
        let Some(pointer) = value.record().as_pointer() else {
            return Ok(());
        };
        let referent = value.arena().kind_of(pointer.target);
        if referent != TypeKind::Function && value.pointer_target()? == 0 {
            node.display = Some(DisplayValue::Null);
            return Ok(());
        }
        match referent {
            kind if kind.is_struct_like() => walk_fields(node, value.index(0)?)?,
            TypeKind::Function => format_callable(node, value.cast(pointer.target)),
            TypeKind::Char if self.config.unsafe_string_dump => {
                let scan = scan_c_string_at(value, self.config.max_string_length)?;
                node.class = DisplayClass::BinaryString;
                node.display = Some(DisplayValue::Bytes(scan));
            }
            TypeKind::Char => {
                node.header.push_str(UNSAFE_ACCESS_SUFFIX);
                node.push(EntryLabel::Offset(0), Child::Value(value.index(0)?));
            }
            _ => node.push(EntryLabel::Offset(0), Child::Value(value.index(0)?)),
        }
        Ok(())
    }
}

fn scan_c_string_at(value: ForeignValue<'_>, max_len: usize) -> MemoryResult<Vec<u8>> {
    let target = value.pointer_target()?;
    let scan = scan_c_string(value.memory(), target, max_len);
    if let Some(err) = &scan.fault {
        warn!(
            address = target,
            read = scan.bytes.len(),
            error = %err,
            "string scan stopped at unreadable memory"
        );
    } else if scan.truncated() {
        trace!(address = target, max_len, "string scan hit the length cap");
    }
    Ok(scan.bytes)
}

/// Header becomes the signature; the return type is the only entry.
fn format_callable<'a>(node: &mut PresentationNode<'a>, value: ForeignValue<'a>) {
    let arena = value.arena();
    if let TypeRecord::Callable(callable) = value.record() {
        node.header = signature(arena, callable);
        node.push(
            EntryLabel::virtual_key("returnType"),
            Child::Node(Box::new(format_type(arena, callable.returns))),
        );
    }
}

/// Emits every member in declaration order. Aggregates and pointers to aggregates are keyed
/// by bare name; everything else carries its type name as `name<type>`.
fn walk_fields<'a>(node: &mut PresentationNode<'a>, value: ForeignValue<'a>) -> MemoryResult<()> {
    let arena = value.arena();
    for entry in value.fields() {
        let (name, field) = entry?;
        let bare = match field.record() {
            TypeRecord::Aggregate(_) => true,
            TypeRecord::Pointer(pointer) => arena.kind_of(pointer.target).is_struct_like(),
            _ => false,
        };
        let label = if bare {
            name.to_string()
        } else {
            format!("{name}<{}>", field.type_name())
        };
        node.push(EntryLabel::Virtual(label), Child::Value(field));
    }
    Ok(())
}

fn format_array<'a>(node: &mut PresentationNode<'a>, value: ForeignValue<'a>) -> MemoryResult<()> {
    let TypeRecord::Sequence(sequence) = value.record() else {
        return Ok(());
    };
    let arena = value.arena();
    if arena.kind_of(sequence.element) == TypeKind::Char {
        // arrays have a trusted length: read all of it, embedded nul bytes included
        let bytes = value.read_bytes(sequence.byte_size() as usize)?;
        node.class = DisplayClass::BinaryString;
        node.display = Some(DisplayValue::Bytes(bytes));
        return Ok(());
    }
    let element = type_name(arena, sequence.element);
    node.header = element.clone();
    node.class = DisplayClass::Length(sequence.count);
    node.display = Some(DisplayValue::Array { element });
    for index in 0..sequence.count {
        node.push(EntryLabel::Index(index), Child::Value(value.index(index)?));
    }
    Ok(())
}
