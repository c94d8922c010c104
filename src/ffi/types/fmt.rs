//! C spelling of type names and function signatures.

use super::arena::{TypeArena, TypeId};
use super::callable::CallableType;
use super::record::{TypeKind, TypeRecord};

pub const ANONYMOUS: &str = "<anonymous>";

/// Renders a type the way a C declaration would spell it without an identifier:
/// `char*`, `uint8_t[8]`, `struct <anonymous>**`, `int32_t(*)()`.
pub fn type_name(arena: &TypeArena, ty: TypeId) -> String {
    declarator(arena, ty, String::new())
}

fn declarator(arena: &TypeArena, ty: TypeId, inner: String) -> String {
    match arena.get(ty) {
        TypeRecord::Pointer(pointer) => {
            let wrapped = match arena.kind_of(pointer.target) {
                TypeKind::Array | TypeKind::Function => format!("(*{inner})"),
                _ => format!("*{inner}"),
            };
            declarator(arena, pointer.target, wrapped)
        }
        TypeRecord::Sequence(sequence) => {
            declarator(arena, sequence.element, format!("{inner}[{}]", sequence.count))
        }
        // parameter lists only appear in signatures
        TypeRecord::Callable(callable) => declarator(arena, callable.returns, format!("{inner}()")),
        _ => format!("{}{inner}", base_name(arena, ty)),
    }
}

fn base_name(arena: &TypeArena, ty: TypeId) -> String {
    match arena.get(ty) {
        TypeRecord::Void => "void".to_string(),
        TypeRecord::Scalar(scalar) => arena.resolve_string(scalar.name_id).to_string(),
        TypeRecord::Enum(enum_type) => {
            let name = enum_type
                .name_id
                .map_or(ANONYMOUS, |id| arena.resolve_string(id));
            format!("enum {name}")
        }
        TypeRecord::Aggregate(aggregate) => {
            let name = aggregate
                .name_id
                .map_or(ANONYMOUS, |id| arena.resolve_string(id));
            format!("{} {name}", aggregate.kind.keyword())
        }
        TypeRecord::Opaque(opaque) => opaque
            .name_id
            .map_or(ANONYMOUS, |id| arena.resolve_string(id))
            .to_string(),
        TypeRecord::Pointer(_) | TypeRecord::Sequence(_) | TypeRecord::Callable(_) => {
            type_name(arena, ty)
        }
    }
}

/// `[abi] callable(param, ...): return`
pub fn signature(arena: &TypeArena, callable: &CallableType) -> String {
    let mut params: Vec<String> = callable
        .params
        .iter()
        .map(|param| type_name(arena, *param))
        .collect();
    if callable.variadic {
        params.push("...".to_string());
    }
    format!(
        "[{}] callable({}): {}",
        callable.abi.tag(),
        params.join(", "),
        type_name(arena, callable.returns)
    )
}

pub fn format_hex(value: u64, width: usize) -> String {
    format!("0x{value:0width$x}")
}
