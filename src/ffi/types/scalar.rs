//! Scalar and enumeration descriptors plus decoding of their raw storage.

use smallvec::SmallVec;

use super::arena::{StringId, TypeArena};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarEncoding {
    Unsigned,
    Signed,
    Floating,
    Bool,
    Char,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarType {
    pub name_id: StringId,
    pub byte_size: u32,
    pub encoding: ScalarEncoding,
}

/// A scalar read out of foreign memory.
#[derive(Clone, Debug, PartialEq)]
pub enum CScalar {
    Unsigned(u64),
    Signed(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(u8),
    Enum { label: Option<String>, value: i64 },
    Address(u64),
}

impl ScalarType {
    pub fn new(name_id: StringId, byte_size: u32, encoding: ScalarEncoding) -> Self {
        Self {
            name_id,
            byte_size,
            encoding,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.encoding, ScalarEncoding::Signed)
    }

    pub fn bit_size(&self) -> u16 {
        (self.byte_size as u16) * 8
    }

    /// Interprets the low `byte_size` bytes of `raw` according to the encoding.
    pub fn decode(&self, raw: u128) -> CScalar {
        let unsigned = raw & self.value_mask();
        match self.encoding {
            ScalarEncoding::Unsigned => CScalar::Unsigned(unsigned as u64),
            ScalarEncoding::Signed => CScalar::Signed(self.sign_extend(unsigned) as i64),
            ScalarEncoding::Floating => match self.byte_size {
                4 => CScalar::F32(f32::from_bits(unsigned as u32)),
                _ => CScalar::F64(f64::from_bits(unsigned as u64)),
            },
            ScalarEncoding::Bool => CScalar::Bool(unsigned != 0),
            ScalarEncoding::Char => CScalar::Char(unsigned as u8),
        }
    }

    fn sign_extend(&self, unsigned: u128) -> i128 {
        if self.byte_size == 0 {
            return 0;
        }
        let shift = 128 - self.bit_size() as u32;
        ((unsigned << shift) as i128) >> shift
    }

    fn value_mask(&self) -> u128 {
        match self.bit_size() {
            0 => 0,
            128 => u128::MAX,
            bits => (1u128 << bits) - 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumVariant {
    pub label: StringId,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name_id: Option<StringId>,
    pub base: ScalarType,
    pub variants: SmallVec<[EnumVariant; 4]>,
}

impl EnumType {
    pub fn new(name_id: Option<StringId>, base: ScalarType) -> Self {
        Self {
            name_id,
            base,
            variants: SmallVec::new(),
        }
    }

    pub fn push_variant(&mut self, variant: EnumVariant) {
        self.variants.push(variant);
    }

    pub fn label_for(&self, value: i64) -> Option<StringId> {
        self.variants
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.label)
    }

    pub fn decode(&self, arena: &TypeArena, raw: u128) -> CScalar {
        let value = match self.base.decode(raw) {
            CScalar::Signed(value) => value,
            CScalar::Unsigned(value) => value as i64,
            _ => 0,
        };
        let label = self
            .label_for(value)
            .map(|id| arena.resolve_string(id).to_string());
        CScalar::Enum { label, value }
    }
}
