use thiserror::Error;

pub type MemoryResult<T> = Result<T, MemoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address 0x{address:016X} is not mapped")]
    NotMapped { address: u64 },
    #[error("access 0x{address:016X}+{len} runs past region end 0x{end:016X}")]
    OutOfRange { address: u64, len: u64, end: u64 },
    #[error("address 0x{base:016X}+0x{offset:X} wraps past the end of the address space")]
    AddressOverflow { base: u64, offset: u64 },
    #[error("region '{name}' at 0x{base:016X} overlaps an existing mapping")]
    Overlap { name: String, base: u64 },
    #[error("value of type '{ty}' is not a scalar")]
    NotScalar { ty: String },
    #[error("value of type '{ty}' cannot be indexed")]
    NotIndexable { ty: String },
    #[error("index {index} is outside '{ty}'")]
    IndexOutOfBounds { ty: String, index: u32 },
    #[error("'{ty}' has no field named '{name}'")]
    NoSuchField { ty: String, name: String },
}
