//! Defines the canonical record structures stored inside the type arena.

use super::aggregate::{AggregateKind, AggregateType};
use super::arena::{StringId, TypeId};
use super::callable::CallableType;
use super::pointer::PointerType;
use super::scalar::{EnumType, ScalarEncoding, ScalarType};
use super::sequence::SequenceType;

/// Describes a contiguous slice of members stored inside the arena side table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberSpan {
    start: u32,
    len: u32,
}

impl MemberSpan {
    pub fn empty() -> Self {
        Self { start: 0, len: 0 }
    }

    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start: start as u32,
            len: len as u32,
        }
    }

    pub fn start(&self) -> usize {
        self.start as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A named struct/union member and its byte offset from the start of the aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRecord {
    pub name_id: StringId,
    pub ty: TypeId,
    pub offset: u32,
}

impl MemberRecord {
    pub fn new(name_id: StringId, ty: TypeId, offset: u32) -> Self {
        Self { name_id, ty, offset }
    }
}

/// Fallback for runtime types the model does not describe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueType {
    pub name_id: Option<StringId>,
    pub byte_size: u32,
}

/// All supported type shapes. The variant fully determines which fields exist.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeRecord {
    Void,
    Scalar(ScalarType),
    Enum(EnumType),
    Pointer(PointerType),
    Callable(CallableType),
    Aggregate(AggregateType),
    Sequence(SequenceType),
    Opaque(OpaqueType),
}

/// Flat classification of a record, as seen by the dump dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Bool,
    Char,
    Integer { signed: bool, bits: u16 },
    Float { bits: u16 },
    Enum,
    Pointer,
    Function,
    Struct,
    Union,
    Array,
    Opaque,
}

impl TypeKind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TypeKind::Bool | TypeKind::Char | TypeKind::Integer { .. } | TypeKind::Float { .. }
        )
    }

    pub fn is_struct_like(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Union)
    }
}

impl TypeRecord {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeRecord::Void => TypeKind::Void,
            TypeRecord::Scalar(scalar) => match scalar.encoding {
                ScalarEncoding::Bool => TypeKind::Bool,
                ScalarEncoding::Char => TypeKind::Char,
                ScalarEncoding::Floating => TypeKind::Float {
                    bits: scalar.bit_size(),
                },
                ScalarEncoding::Signed | ScalarEncoding::Unsigned => TypeKind::Integer {
                    signed: scalar.is_signed(),
                    bits: scalar.bit_size(),
                },
            },
            TypeRecord::Enum(_) => TypeKind::Enum,
            TypeRecord::Pointer(_) => TypeKind::Pointer,
            TypeRecord::Callable(_) => TypeKind::Function,
            TypeRecord::Aggregate(aggregate) => match aggregate.kind {
                AggregateKind::Struct => TypeKind::Struct,
                AggregateKind::Union => TypeKind::Union,
            },
            TypeRecord::Sequence(_) => TypeKind::Array,
            TypeRecord::Opaque(_) => TypeKind::Opaque,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        if let TypeRecord::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerType> {
        if let TypeRecord::Pointer(value) = self {
            Some(value)
        } else {
            None
        }
    }
}
