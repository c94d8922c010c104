//! Fluent construction helpers that describe C declarations inside the arena.

use super::aggregate::{AggregateKind, AggregateType};
use super::arena::{StringId, TypeArena, TypeId};
use super::callable::{CallableType, CallingConvention};
use super::error::{TypeError, TypeResult};
use super::fmt::type_name;
use super::pointer::{PointerQualifiers, PointerType};
use super::record::{MemberRecord, MemberSpan, OpaqueType, TypeRecord};
use super::scalar::{EnumType, EnumVariant, ScalarEncoding, ScalarType};
use super::sequence::SequenceType;

/// Built-in C types. `Long` and `PtrDiff` are resolved to the fixed-width type the
/// target ABI uses for them, which is also the name they are displayed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Char,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    Long,
    PtrDiff,
}

impl Primitive {
    pub fn canonical(self) -> Self {
        match self {
            Primitive::Long if cfg!(windows) => Primitive::Int32,
            Primitive::Long => Primitive::Int64,
            Primitive::PtrDiff if cfg!(target_pointer_width = "32") => Primitive::Int32,
            Primitive::PtrDiff => Primitive::Int64,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self.canonical() {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::Int8 => "int8_t",
            Primitive::Uint8 => "uint8_t",
            Primitive::Int16 => "int16_t",
            Primitive::Uint16 => "uint16_t",
            Primitive::Int32 => "int32_t",
            Primitive::Uint32 => "uint32_t",
            Primitive::Int64 => "int64_t",
            Primitive::Uint64 => "uint64_t",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Long | Primitive::PtrDiff => unreachable!("aliases are canonicalized"),
        }
    }

    fn layout(self) -> Option<(u32, ScalarEncoding)> {
        let layout = match self.canonical() {
            Primitive::Void => return None,
            Primitive::Bool => (1, ScalarEncoding::Bool),
            Primitive::Char => (1, ScalarEncoding::Char),
            Primitive::Int8 => (1, ScalarEncoding::Signed),
            Primitive::Uint8 => (1, ScalarEncoding::Unsigned),
            Primitive::Int16 => (2, ScalarEncoding::Signed),
            Primitive::Uint16 => (2, ScalarEncoding::Unsigned),
            Primitive::Int32 => (4, ScalarEncoding::Signed),
            Primitive::Uint32 => (4, ScalarEncoding::Unsigned),
            Primitive::Int64 => (8, ScalarEncoding::Signed),
            Primitive::Uint64 => (8, ScalarEncoding::Unsigned),
            Primitive::Float => (4, ScalarEncoding::Floating),
            Primitive::Double => (8, ScalarEncoding::Floating),
            Primitive::Long | Primitive::PtrDiff => unreachable!("aliases are canonicalized"),
        };
        Some(layout)
    }
}

pub struct TypeBuilder<'arena> {
    arena: &'arena mut TypeArena,
}

impl<'arena> TypeBuilder<'arena> {
    pub fn new(arena: &'arena mut TypeArena) -> Self {
        Self { arena }
    }

    pub fn intern<S: AsRef<str>>(&mut self, name: S) -> StringId {
        self.arena.intern_string(name)
    }

    /// Returns the shared record for a built-in type, creating it on first use.
    pub fn primitive(&mut self, primitive: Primitive) -> TypeId {
        let primitive = primitive.canonical();
        if let Some(id) = self.arena.cached_primitive(primitive) {
            return id;
        }
        let record = match primitive.layout() {
            None => TypeRecord::Void,
            Some((byte_size, encoding)) => {
                let name_id = self.intern(primitive.name());
                TypeRecord::Scalar(ScalarType::new(name_id, byte_size, encoding))
            }
        };
        let id = self.arena.push_record(record);
        self.arena.cache_primitive(primitive, id);
        id
    }

    pub fn void(&mut self) -> TypeId {
        self.primitive(Primitive::Void)
    }

    pub fn scalar(&mut self, name: &str, byte_size: u32, encoding: ScalarEncoding) -> TypeId {
        let name_id = self.intern(name);
        let scalar = ScalarType::new(name_id, byte_size, encoding);
        self.arena.push_record(TypeRecord::Scalar(scalar))
    }

    pub fn pointer(&mut self, target: TypeId) -> TypeId {
        self.pointer_with(PointerType::new(target))
    }

    pub fn const_pointer(&mut self, target: TypeId) -> TypeId {
        self.pointer_with(PointerType::new(target).with_qualifiers(PointerQualifiers::CONST))
    }

    pub fn pointer_with(&mut self, pointer: PointerType) -> TypeId {
        self.arena.push_record(TypeRecord::Pointer(pointer))
    }

    pub fn array(&mut self, element: TypeId, count: u32) -> TypeId {
        let stride = self.arena.byte_size(element);
        let sequence = SequenceType::new(element, stride, count);
        self.arena.push_record(TypeRecord::Sequence(sequence))
    }

    pub fn opaque(&mut self, name: Option<&str>, byte_size: u32) -> TypeId {
        let name_id = self.optional_name(name);
        self.arena
            .push_record(TypeRecord::Opaque(OpaqueType { name_id, byte_size }))
    }

    pub fn enumeration(&mut self, name: Option<&str>) -> EnumBuilder<'_, 'arena> {
        EnumBuilder::new(self, name)
    }

    pub fn callable(&mut self, returns: TypeId) -> CallableBuilder<'_, 'arena> {
        CallableBuilder::new(self, returns)
    }

    pub fn structure(&mut self, name: Option<&str>) -> AggregateBuilder<'_, 'arena> {
        self.aggregate(AggregateKind::Struct, name)
    }

    pub fn union(&mut self, name: Option<&str>) -> AggregateBuilder<'_, 'arena> {
        self.aggregate(AggregateKind::Union, name)
    }

    pub fn aggregate(
        &mut self,
        kind: AggregateKind,
        name: Option<&str>,
    ) -> AggregateBuilder<'_, 'arena> {
        let name_id = self.optional_name(name);
        AggregateBuilder::new(self, None, kind, name_id)
    }

    /// Forward-declares an incomplete struct or union so pointers can refer to it before
    /// its members are known (`struct Node { struct Node* next; }`).
    pub fn declare(&mut self, kind: AggregateKind, name: Option<&str>) -> TypeId {
        let name_id = self.optional_name(name);
        let aggregate = AggregateType::new(name_id, kind, MemberSpan::empty(), 0);
        self.arena.push_record(TypeRecord::Aggregate(aggregate))
    }

    /// Completes a declaration made with [`TypeBuilder::declare`].
    pub fn define(&mut self, declared: TypeId) -> AggregateBuilder<'_, 'arena> {
        let existing = match self.arena.get(declared) {
            TypeRecord::Aggregate(aggregate) => Some((aggregate.kind, aggregate.name_id)),
            _ => None,
        };
        match existing {
            Some((kind, name_id)) => AggregateBuilder::new(self, Some(declared), kind, name_id),
            None => {
                let name = type_name(self.arena, declared);
                let mut builder =
                    AggregateBuilder::new(self, None, AggregateKind::Struct, None);
                builder.error = Some(TypeError::NotAggregate { name });
                builder
            }
        }
    }

    fn optional_name(&mut self, name: Option<&str>) -> Option<StringId> {
        name.filter(|value| !value.is_empty())
            .map(|value| self.intern(value))
    }
}

fn align_up(offset: u32, align: u32) -> u32 {
    let align = align.max(1);
    offset.div_ceil(align) * align
}

pub struct AggregateBuilder<'builder, 'arena> {
    builder: &'builder mut TypeBuilder<'arena>,
    target: Option<TypeId>,
    kind: AggregateKind,
    name_id: Option<StringId>,
    members: Vec<MemberRecord>,
    cursor: u32,
    extent: u32,
    align: u32,
    layout: Option<u32>,
    error: Option<TypeError>,
}

impl<'builder, 'arena> AggregateBuilder<'builder, 'arena> {
    fn new(
        builder: &'builder mut TypeBuilder<'arena>,
        target: Option<TypeId>,
        kind: AggregateKind,
        name_id: Option<StringId>,
    ) -> Self {
        Self {
            builder,
            target,
            kind,
            name_id,
            members: Vec::new(),
            cursor: 0,
            extent: 0,
            align: 1,
            layout: None,
            error: None,
        }
    }

    /// Overrides the computed size, e.g. for packed or padded layouts.
    pub fn layout(mut self, bytes: u32) -> Self {
        self.layout = Some(bytes);
        self
    }

    /// Appends a member at the next naturally aligned offset (offset 0 for unions).
    pub fn field(self, name: impl AsRef<str>, ty: TypeId) -> Self {
        let offset = self.next_offset(ty);
        self.member(name, ty, offset)
    }

    /// Places a member at an explicit byte offset.
    pub fn member(mut self, name: impl AsRef<str>, ty: TypeId, offset: u32) -> Self {
        let name_id = self.builder.intern(name);
        self.place(MemberRecord::new(name_id, ty, offset));
        self.grow(ty, offset);
        self
    }

    /// Adds an anonymous struct/union member whose fields are reachable directly from
    /// this aggregate, as C11 anonymous members are.
    pub fn embed(mut self, ty: TypeId) -> Self {
        let base = self.next_offset(ty);
        let arena: &TypeArena = self.builder.arena;
        let TypeRecord::Aggregate(inner) = arena.get(ty) else {
            let name = type_name(arena, ty);
            self.error.get_or_insert(TypeError::NotAggregate { name });
            return self;
        };
        let nested: Vec<MemberRecord> = arena
            .members(inner.members)
            .iter()
            .map(|member| MemberRecord::new(member.name_id, member.ty, base + member.offset))
            .collect();
        for member in nested {
            self.place(member);
        }
        self.grow(ty, base);
        self
    }

    pub fn finish(self) -> TypeResult<TypeId> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let byte_size = self
            .layout
            .unwrap_or_else(|| align_up(self.extent, self.align));
        let arena = &mut *self.builder.arena;
        let span = if self.members.is_empty() {
            MemberSpan::empty()
        } else {
            arena.alloc_members(self.members)
        };
        let record = TypeRecord::Aggregate(AggregateType::new(
            self.name_id,
            self.kind,
            span,
            byte_size,
        ));
        match self.target {
            Some(id) => {
                *arena.get_mut(id) = record;
                Ok(id)
            }
            None => Ok(arena.push_record(record)),
        }
    }

    fn next_offset(&self, ty: TypeId) -> u32 {
        match self.kind {
            AggregateKind::Struct => align_up(self.cursor, self.builder.arena.align_of(ty)),
            AggregateKind::Union => 0,
        }
    }

    fn place(&mut self, record: MemberRecord) {
        if self.error.is_none()
            && self
                .members
                .iter()
                .any(|existing| existing.name_id == record.name_id)
        {
            let name = self.builder.arena.resolve_string(record.name_id).to_string();
            self.error = Some(TypeError::DuplicateMember { name });
        }
        self.members.push(record);
    }

    fn grow(&mut self, ty: TypeId, offset: u32) {
        let arena: &TypeArena = self.builder.arena;
        let end = offset + arena.byte_size(ty);
        self.cursor = self.cursor.max(end);
        self.extent = self.extent.max(end);
        self.align = self.align.max(arena.align_of(ty));
    }
}

pub struct EnumBuilder<'builder, 'arena> {
    builder: &'builder mut TypeBuilder<'arena>,
    ty: EnumType,
}

impl<'builder, 'arena> EnumBuilder<'builder, 'arena> {
    fn new(builder: &'builder mut TypeBuilder<'arena>, name: Option<&str>) -> Self {
        let name_id = builder.optional_name(name);
        let base_name = builder.intern(Primitive::Int32.name());
        let base = ScalarType::new(base_name, 4, ScalarEncoding::Signed);
        Self {
            builder,
            ty: EnumType::new(name_id, base),
        }
    }

    pub fn variant(mut self, label: impl AsRef<str>, value: i64) -> Self {
        let label_id = self.builder.intern(label);
        self.ty.push_variant(EnumVariant {
            label: label_id,
            value,
        });
        self
    }

    pub fn finish(self) -> TypeId {
        self.builder.arena.push_record(TypeRecord::Enum(self.ty))
    }
}

pub struct CallableBuilder<'builder, 'arena> {
    builder: &'builder mut TypeBuilder<'arena>,
    ty: CallableType,
}

impl<'builder, 'arena> CallableBuilder<'builder, 'arena> {
    fn new(builder: &'builder mut TypeBuilder<'arena>, returns: TypeId) -> Self {
        Self {
            builder,
            ty: CallableType::new(returns),
        }
    }

    pub fn param(mut self, ty: TypeId) -> Self {
        self.ty.params.push(ty);
        self
    }

    pub fn abi(mut self, abi: CallingConvention) -> Self {
        self.ty.abi = abi;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.ty.variadic = true;
        self
    }

    pub fn finish(self) -> TypeId {
        self.builder.arena.push_record(TypeRecord::Callable(self.ty))
    }
}
