//! Presentation tree produced by the formatters and consumed by a host renderer.

use std::fmt;

use crate::ffi::memory::ForeignValue;
use crate::ffi::types::CScalar;

/// How the host should present a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayClass {
    Object,
    /// `display` holds raw bytes to be shown as a binary string.
    BinaryString,
    /// A positional container of `n` elements.
    Length(u32),
}

/// Overrides the host's default object presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayValue {
    Bytes(Vec<u8>),
    Array { element: String },
    Null,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryLabel {
    /// Synthetic key such as `cdata`, `returnType` or `x<uint32_t>`.
    Virtual(String),
    /// Pointee at a byte offset, shown as `+n`.
    Offset(u32),
    /// Array position.
    Index(u32),
}

impl EntryLabel {
    pub fn virtual_key(name: impl Into<String>) -> Self {
        EntryLabel::Virtual(name.into())
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryLabel::Virtual(name) => f.write_str(name),
            EntryLabel::Offset(offset) => write!(f, "+{offset}"),
            EntryLabel::Index(index) => write!(f, "{index}"),
        }
    }
}

/// An entry's payload. `Value` is handed back unexpanded; the host decides whether to recurse.
#[derive(Clone, Debug, PartialEq)]
pub enum Child<'a> {
    Scalar(CScalar),
    Value(ForeignValue<'a>),
    Node(Box<PresentationNode<'a>>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry<'a> {
    pub label: EntryLabel,
    pub child: Child<'a>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PresentationNode<'a> {
    pub header: String,
    pub class: DisplayClass,
    /// Identity shown by the host. Always zero: foreign handles have no stable identity.
    pub handle: u64,
    pub display: Option<DisplayValue>,
    pub entries: Vec<Entry<'a>>,
}

impl<'a> PresentationNode<'a> {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            class: DisplayClass::Object,
            handle: 0,
            display: None,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, label: EntryLabel, child: Child<'a>) {
        self.entries.push(Entry { label, child });
    }

    pub fn entry(&self, label: &str) -> Option<&Child<'a>> {
        self.entries
            .iter()
            .find(|entry| entry.label.to_string() == label)
            .map(|entry| &entry.child)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.to_string()).collect()
    }

    pub fn is_binary_string(&self) -> bool {
        self.class == DisplayClass::BinaryString
    }
}

/// Result of formatting one value.
#[derive(Clone, Debug, PartialEq)]
pub enum Dump<'a> {
    Node(PresentationNode<'a>),
    /// Left to the host's generic representation.
    Generic(ForeignValue<'a>),
}

impl<'a> Dump<'a> {
    pub fn into_node(self) -> Option<PresentationNode<'a>> {
        match self {
            Dump::Node(node) => Some(node),
            Dump::Generic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_render_like_var_dumper_keys() {
        assert_eq!(EntryLabel::virtual_key("x<uint32_t>").to_string(), "x<uint32_t>");
        assert_eq!(EntryLabel::Offset(0).to_string(), "+0");
        assert_eq!(EntryLabel::Index(7).to_string(), "7");
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut node = PresentationNode::new("struct Example");
        node.push(EntryLabel::virtual_key("b"), Child::Scalar(CScalar::Signed(1)));
        node.push(EntryLabel::virtual_key("a"), Child::Scalar(CScalar::Signed(2)));
        assert_eq!(node.labels(), vec!["b", "a"]);
        assert_eq!(node.entry("a"), Some(&Child::Scalar(CScalar::Signed(2))));
        assert_eq!(node.handle, 0);
    }
}
