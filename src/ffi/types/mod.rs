//! Entry point for the `ffi::types` subsystem: an arena of C type descriptors plus the
//! builders and name rendering used by the dump formatter.

pub mod aggregate;
pub mod arena;
pub mod builder;
pub mod callable;
pub mod error;
pub mod fmt;
pub mod pointer;
pub mod record;
pub mod scalar;
pub mod sequence;

pub use aggregate::{AggregateKind, AggregateType};
pub use arena::{StringId, TypeArena, TypeId};
pub use builder::{AggregateBuilder, CallableBuilder, EnumBuilder, Primitive, TypeBuilder};
pub use callable::{CallableType, CallingConvention};
pub use error::{TypeError, TypeResult};
pub use fmt::{signature, type_name};
pub use pointer::{PointerQualifiers, PointerType};
pub use record::{MemberRecord, MemberSpan, OpaqueType, TypeKind, TypeRecord};
pub use scalar::{CScalar, EnumType, EnumVariant, ScalarEncoding, ScalarType};
pub use sequence::SequenceType;
