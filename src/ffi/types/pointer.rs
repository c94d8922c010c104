//! Data and function pointer metadata.

use bitflags::bitflags;

use super::arena::TypeId;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerQualifiers: u8 {
        const CONST = 0b001;
        const VOLATILE = 0b010;
        const RESTRICT = 0b100;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerType {
    pub target: TypeId,
    pub qualifiers: PointerQualifiers,
    pub byte_size: u32,
}

impl PointerType {
    pub fn new(target: TypeId) -> Self {
        Self {
            target,
            qualifiers: PointerQualifiers::empty(),
            byte_size: 8,
        }
    }

    pub fn with_byte_size(mut self, byte_size: u32) -> Self {
        self.byte_size = byte_size.max(1);
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: PointerQualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    /// Qualifiers describe the pointee (`const char*`) and never change how the pointer is shown.
    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(PointerQualifiers::CONST)
    }
}
