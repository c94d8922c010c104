//! Stores C type records plus the interned names and member tables they point into.

use std::num::NonZeroU32;

use ahash::AHashMap;

use super::builder::Primitive;
use super::record::{MemberRecord, MemberSpan, TypeKind, TypeRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(NonZeroU32);

impl TypeId {
    pub fn from_index(index: usize) -> Self {
        let raw = NonZeroU32::new((index as u32) + 1).expect("index overflow");
        Self(raw)
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringId(NonZeroU32);

impl StringId {
    fn from_index(index: usize) -> Self {
        let raw = NonZeroU32::new((index as u32) + 1).expect("string index overflow");
        Self(raw)
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(Default, Debug)]
struct StringPool {
    values: Vec<String>,
    lookup: AHashMap<String, StringId>,
}

impl StringPool {
    fn intern<S: AsRef<str>>(&mut self, value: S) -> StringId {
        let value_ref = value.as_ref();
        if let Some(id) = self.lookup.get(value_ref) {
            return *id;
        }
        let owned = value_ref.to_owned();
        let id = StringId::from_index(self.values.len());
        self.values.push(owned.clone());
        self.lookup.insert(owned, id);
        id
    }

    fn resolve(&self, id: StringId) -> &str {
        &self.values[id.index()]
    }
}

/// Owns every type descriptor handed to the formatter. Records are only ever appended or,
/// for forward declarations, completed in place, so a `TypeId` stays valid for the arena's
/// whole lifetime.
#[derive(Default, Debug)]
pub struct TypeArena {
    records: Vec<TypeRecord>,
    members: Vec<MemberRecord>,
    strings: StringPool,
    primitives: AHashMap<Primitive, TypeId>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&mut self, record: TypeRecord) -> TypeId {
        self.records.push(record);
        TypeId::from_index(self.records.len() - 1)
    }

    pub fn get(&self, id: TypeId) -> &TypeRecord {
        &self.records[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeRecord {
        &mut self.records[id.index()]
    }

    pub fn kind_of(&self, id: TypeId) -> TypeKind {
        self.get(id).kind()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn alloc_members<I>(&mut self, members: I) -> MemberSpan
    where
        I: IntoIterator<Item = MemberRecord>,
    {
        let start = self.members.len();
        self.members.extend(members);
        MemberSpan::new(start, self.members.len() - start)
    }

    pub fn members(&self, span: MemberSpan) -> &[MemberRecord] {
        let start = span.start();
        let end = start + span.len();
        &self.members[start..end]
    }

    pub fn intern_string<S: AsRef<str>>(&mut self, value: S) -> StringId {
        self.strings.intern(value)
    }

    pub fn resolve_string(&self, id: StringId) -> &str {
        self.strings.resolve(id)
    }

    /// Storage size in bytes. Functions and `void` occupy nothing.
    pub fn byte_size(&self, id: TypeId) -> u32 {
        match self.get(id) {
            TypeRecord::Void | TypeRecord::Callable(_) => 0,
            TypeRecord::Scalar(scalar) => scalar.byte_size,
            TypeRecord::Enum(enum_type) => enum_type.base.byte_size,
            TypeRecord::Pointer(pointer) => pointer.byte_size,
            TypeRecord::Aggregate(aggregate) => aggregate.byte_size,
            TypeRecord::Sequence(sequence) => sequence.byte_size(),
            TypeRecord::Opaque(opaque) => opaque.byte_size,
        }
    }

    /// Natural alignment, used by the builder when laying out members.
    pub fn align_of(&self, id: TypeId) -> u32 {
        match self.get(id) {
            TypeRecord::Void | TypeRecord::Callable(_) => 1,
            TypeRecord::Scalar(scalar) => scalar.byte_size.max(1),
            TypeRecord::Enum(enum_type) => enum_type.base.byte_size.max(1),
            TypeRecord::Pointer(pointer) => pointer.byte_size.max(1),
            TypeRecord::Aggregate(aggregate) => self
                .members(aggregate.members)
                .iter()
                .map(|member| self.align_of(member.ty))
                .max()
                .unwrap_or(1),
            TypeRecord::Sequence(sequence) => self.align_of(sequence.element),
            TypeRecord::Opaque(_) => 1,
        }
    }

    pub(crate) fn cached_primitive(&self, primitive: Primitive) -> Option<TypeId> {
        self.primitives.get(&primitive).copied()
    }

    pub(crate) fn cache_primitive(&mut self, primitive: Primitive, id: TypeId) {
        self.primitives.insert(primitive, id);
    }
}
