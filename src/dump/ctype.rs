use crate::ffi::types::{TypeArena, TypeId, type_name};

use super::node::PresentationNode;

/// Formats a bare type descriptor as `CType<name>` with no entries.
pub fn format_type<'a>(arena: &TypeArena, ty: TypeId) -> PresentationNode<'a> {
    PresentationNode::new(format!("CType<{}>", type_name(arena, ty)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::node::DisplayClass;
    use crate::ffi::types::{Primitive, TypeBuilder};

    #[test]
    fn type_nodes_wrap_the_c_name() {
        let mut arena = TypeArena::new();
        let mut builder = TypeBuilder::new(&mut arena);
        let void = builder.void();
        let u8_ty = builder.primitive(Primitive::Uint8);
        let ptr = builder.pointer(u8_ty);

        let node = format_type(&arena, void);
        assert_eq!(node.header, "CType<void>");
        assert_eq!(node.class, DisplayClass::Object);
        assert!(node.entries.is_empty(), "type nodes never carry entries");
        assert_eq!(format_type(&arena, ptr).header, "CType<uint8_t*>");
    }
}
