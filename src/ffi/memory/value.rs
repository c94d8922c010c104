//! `ForeignValue` pairs a type descriptor with the address of a value in foreign memory and
//! offers the reads the formatter needs: scalars, indexing, dereferencing and fields.

use std::fmt;

use crate::ffi::types::{CScalar, TypeArena, TypeId, TypeKind, TypeRecord, type_name};

use super::error::{MemoryError, MemoryResult};
use super::image::ForeignMemory;

/// Borrowed view of one value. Cheap to copy; never outlives the arena or the memory.
#[derive(Clone, Copy)]
pub struct ForeignValue<'a> {
    arena: &'a TypeArena,
    memory: &'a dyn ForeignMemory,
    ty: TypeId,
    address: u64,
}

/// What reading a field or element hands back: scalar kinds convert to plain values and a
/// null pointer collapses to `Null`; everything else stays a handle.
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded<'a> {
    Scalar(CScalar),
    Null,
    Data(ForeignValue<'a>),
}

impl<'a> ForeignValue<'a> {
    pub fn new(
        arena: &'a TypeArena,
        memory: &'a dyn ForeignMemory,
        ty: TypeId,
        address: u64,
    ) -> Self {
        Self {
            arena,
            memory,
            ty,
            address,
        }
    }

    pub fn arena(&self) -> &'a TypeArena {
        self.arena
    }

    pub fn memory(&self) -> &'a dyn ForeignMemory {
        self.memory
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn kind(&self) -> TypeKind {
        self.arena.kind_of(self.ty)
    }

    pub fn record(&self) -> &'a TypeRecord {
        self.arena.get(self.ty)
    }

    pub fn type_name(&self) -> String {
        type_name(self.arena, self.ty)
    }

    pub fn byte_size(&self) -> u32 {
        self.arena.byte_size(self.ty)
    }

    /// Reinterprets the same address as another type.
    pub fn cast(&self, ty: TypeId) -> Self {
        Self { ty, ..*self }
    }

    /// The value of type `ty` located `offset` bytes past this one.
    fn offset(&self, ty: TypeId, base: u64, offset: u64) -> MemoryResult<Self> {
        let address = base
            .checked_add(offset)
            .ok_or(MemoryError::AddressOverflow { base, offset })?;
        Ok(Self {
            ty,
            address,
            ..*self
        })
    }

    pub fn read_bytes(&self, len: usize) -> MemoryResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.memory.read(self.address, &mut buf)?;
        Ok(buf)
    }

    fn read_raw(&self, byte_size: u32) -> MemoryResult<u128> {
        let bytes = self.read_bytes(byte_size as usize)?;
        Ok(self.memory.endianness().decode_bytes(&bytes))
    }

    /// Reads a scalar, enum or pointer value. Pointers yield their target address.
    pub fn scalar(&self) -> MemoryResult<CScalar> {
        match self.record() {
            TypeRecord::Scalar(scalar) => Ok(scalar.decode(self.read_raw(scalar.byte_size)?)),
            TypeRecord::Enum(enum_type) => {
                let raw = self.read_raw(enum_type.base.byte_size)?;
                Ok(enum_type.decode(self.arena, raw))
            }
            TypeRecord::Pointer(_) => Ok(CScalar::Address(self.pointer_target()?)),
            _ => Err(MemoryError::NotScalar {
                ty: self.type_name(),
            }),
        }
    }

    /// Address stored in a pointer value.
    pub fn pointer_target(&self) -> MemoryResult<u64> {
        let Some(pointer) = self.record().as_pointer() else {
            return Err(MemoryError::NotIndexable {
                ty: self.type_name(),
            });
        };
        Ok(self.read_raw(pointer.byte_size)? as u64)
    }

    /// Array element `index`, or for pointers the `index`th pointee (`index(0)` dereferences).
    /// Pointer indexing is unchecked: the pointee count is unknown.
    pub fn index(&self, index: u32) -> MemoryResult<ForeignValue<'a>> {
        match self.record() {
            TypeRecord::Sequence(sequence) => {
                let offset = sequence.element_offset(index).ok_or_else(|| {
                    MemoryError::IndexOutOfBounds {
                        ty: self.type_name(),
                        index,
                    }
                })?;
                self.offset(sequence.element, self.address, offset)
            }
            TypeRecord::Pointer(pointer) => {
                let base = self.pointer_target()?;
                let stride = self.arena.byte_size(pointer.target) as u64;
                let offset =
                    stride
                        .checked_mul(index as u64)
                        .ok_or(MemoryError::AddressOverflow {
                            base,
                            offset: stride.saturating_mul(index as u64),
                        })?;
                self.offset(pointer.target, base, offset)
            }
            _ => Err(MemoryError::NotIndexable {
                ty: self.type_name(),
            }),
        }
    }

    pub fn field(&self, name: &str) -> MemoryResult<ForeignValue<'a>> {
        for entry in self.fields() {
            let (field, value) = entry?;
            if field == name {
                return Ok(value);
            }
        }
        Err(MemoryError::NoSuchField {
            ty: self.type_name(),
            name: name.to_string(),
        })
    }

    /// Members of a struct or union in declaration order; empty for other kinds. A member whose
    /// address would wrap past `u64::MAX` yields an error.
    pub fn fields(&self) -> Fields<'a> {
        let members = match self.record() {
            TypeRecord::Aggregate(aggregate) => self.arena.members(aggregate.members),
            _ => &[],
        };
        Fields {
            base: *self,
            members: members.iter(),
        }
    }

    /// Converts the value the way a field read does.
    pub fn load(&self) -> MemoryResult<Loaded<'a>> {
        match self.kind() {
            kind if kind.is_scalar() || kind == TypeKind::Enum => {
                Ok(Loaded::Scalar(self.scalar()?))
            }
            TypeKind::Pointer if self.pointer_target()? == 0 => Ok(Loaded::Null),
            _ => Ok(Loaded::Data(*self)),
        }
    }
}

pub struct Fields<'a> {
    base: ForeignValue<'a>,
    members: std::slice::Iter<'a, crate::ffi::types::MemberRecord>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = MemoryResult<(&'a str, ForeignValue<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let member = self.members.next()?;
        let name = self.base.arena.resolve_string(member.name_id);
        let value = self
            .base
            .offset(member.ty, self.base.address, member.offset as u64);
        Some(value.map(|value| (name, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.members.size_hint()
    }
}

impl PartialEq for ForeignValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena)
            && std::ptr::addr_eq(self.memory, other.memory)
            && self.ty == other.ty
            && self.address == other.address
    }
}

impl fmt::Debug for ForeignValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignValue")
            .field("ty", &self.type_name())
            .field("address", &format_args!("0x{:016X}", self.address))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Targeted tests verifying typed reads against an in-memory image.
    use super::*;
    use crate::ffi::memory::{Endianness, MemoryImage};
    use crate::ffi::types::{Primitive, TypeBuilder};
    use hex_literal::hex;

    fn image_with(bytes: &[u8]) -> MemoryImage {
        let image = MemoryImage::new(Endianness::Little);
        image.map_bytes("heap", 0x1000, bytes).unwrap();
        image
    }

    #[test]
    fn reads_signed_and_unsigned_scalars() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let i16_ty = builder.primitive(Primitive::Int16);
        let u32_ty = builder.primitive(Primitive::Uint32);
        let image = image_with(&hex!("feff efbeadde"));

        let signed = ForeignValue::new(&arena, &image, i16_ty, 0x1000);
        let unsigned = ForeignValue::new(&arena, &image, u32_ty, 0x1002);
        assert_eq!(signed.scalar(), Ok(CScalar::Signed(-2)));
        assert_eq!(unsigned.scalar(), Ok(CScalar::Unsigned(0xDEAD_BEEF)));
    }

    #[test]
    fn pointer_index_dereferences_target() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let u16_ty = builder.primitive(Primitive::Uint16);
        let ptr_ty = builder.pointer(u16_ty);
        let image = image_with(&hex!("0810000000000000 0100 0200"));

        let pointer = ForeignValue::new(&arena, &image, ptr_ty, 0x1000);
        assert_eq!(pointer.pointer_target(), Ok(0x1008));
        assert_eq!(pointer.index(0).unwrap().scalar(), Ok(CScalar::Unsigned(1)));
        assert_eq!(
            pointer.index(1).unwrap().scalar(),
            Ok(CScalar::Unsigned(2)),
            "pointer arithmetic advances by the pointee size"
        );
    }

    #[test]
    fn array_index_is_bounds_checked() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let u8_ty = builder.primitive(Primitive::Uint8);
        let array = builder.array(u8_ty, 2);
        let image = image_with(&hex!("0a0b"));

        let value = ForeignValue::new(&arena, &image, array, 0x1000);
        assert_eq!(value.index(1).unwrap().scalar(), Ok(CScalar::Unsigned(0x0b)));
        assert_eq!(
            value.index(2),
            Err(MemoryError::IndexOutOfBounds {
                ty: "uint8_t[2]".into(),
                index: 2
            })
        );
    }

    #[test]
    fn fields_follow_declaration_order() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let u8_ty = builder.primitive(Primitive::Uint8);
        let u32_ty = builder.primitive(Primitive::Uint32);
        let record = builder
            .structure(Some("Pair"))
            .field("tag", u8_ty)
            .field("value", u32_ty)
            .finish()
            .unwrap();
        let image = image_with(&hex!("07000000 2a000000"));

        let value = ForeignValue::new(&arena, &image, record, 0x1000);
        let names: Vec<&str> = value
            .fields()
            .map(|entry| entry.map(|(name, _)| name))
            .collect::<MemoryResult<_>>()
            .unwrap();
        assert_eq!(names, vec!["tag", "value"]);
        let field = value.field("value").unwrap();
        assert_eq!(field.address(), 0x1004);
        assert_eq!(field.scalar(), Ok(CScalar::Unsigned(42)));
        assert!(matches!(
            value.field("missing"),
            Err(MemoryError::NoSuchField { .. })
        ));
    }

    #[test]
    fn load_converts_scalars_and_null_pointers() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let i32_ty = builder.primitive(Primitive::Int32);
        let ptr_ty = builder.pointer(i32_ty);
        let array = builder.array(i32_ty, 1);
        let image = image_with(&hex!("0000000000000000 05000000"));

        let null = ForeignValue::new(&arena, &image, ptr_ty, 0x1000);
        let scalar = ForeignValue::new(&arena, &image, i32_ty, 0x1008);
        let aggregate = ForeignValue::new(&arena, &image, array, 0x1008);
        assert_eq!(null.load(), Ok(Loaded::Null));
        assert_eq!(scalar.load(), Ok(Loaded::Scalar(CScalar::Signed(5))));
        assert_eq!(aggregate.load(), Ok(Loaded::Data(aggregate)));
    }

    #[test]
    fn wrapping_addresses_are_reported() {
        // a pointer holding a garbage address near u64::MAX must not overflow
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let i32_ty = builder.primitive(Primitive::Int32);
        let record = builder
            .structure(None)
            .field("a", i32_ty)
            .field("b", i32_ty)
            .finish()
            .unwrap();
        let ptr_ty = builder.pointer(i32_ty);
        let image = image_with(&hex!("feffffffffffffff"));

        let value = ForeignValue::new(&arena, &image, record, 0xFFFF_FFFF_FFFF_FFFE);
        let fields: Vec<_> = value.fields().collect();
        assert!(fields[0].is_ok(), "first member sits at the base address");
        assert_eq!(
            fields[1],
            Err(MemoryError::AddressOverflow {
                base: 0xFFFF_FFFF_FFFF_FFFE,
                offset: 4
            })
        );
        assert!(matches!(value.field("b"), Err(MemoryError::AddressOverflow { .. })));

        let pointer = ForeignValue::new(&arena, &image, ptr_ty, 0x1000);
        assert!(pointer.index(0).is_ok());
        assert!(
            matches!(pointer.index(1), Err(MemoryError::AddressOverflow { .. })),
            "pointer arithmetic past the top of memory is an error"
        );
    }

    #[test]
    fn unmapped_reads_surface_errors() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let u8_ty = builder.primitive(Primitive::Uint8);
        let image = image_with(&[0]);
        let value = ForeignValue::new(&arena, &image, u8_ty, 0x9000);
        assert_eq!(value.scalar(), Err(MemoryError::NotMapped { address: 0x9000 }));
    }
}
