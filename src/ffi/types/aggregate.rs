//! Aggregate type description for structs and unions.

use super::arena::StringId;
use super::record::MemberSpan;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    Struct,
    Union,
}

impl AggregateKind {
    pub fn keyword(self) -> &'static str {
        match self {
            AggregateKind::Struct => "struct",
            AggregateKind::Union => "union",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateType {
    pub name_id: Option<StringId>,
    pub kind: AggregateKind,
    pub members: MemberSpan,
    pub byte_size: u32,
}

impl AggregateType {
    pub fn new(
        name_id: Option<StringId>,
        kind: AggregateKind,
        members: MemberSpan,
        byte_size: u32,
    ) -> Self {
        Self {
            name_id,
            kind,
            members,
            byte_size,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, AggregateKind::Union)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name_id.is_none()
    }
}
