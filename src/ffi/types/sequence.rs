//! Fixed-length C array metadata.

use super::arena::TypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceType {
    pub element: TypeId,
    pub stride_bytes: u32,
    pub count: u32,
}

impl SequenceType {
    pub fn new(element: TypeId, stride_bytes: u32, count: u32) -> Self {
        Self {
            element,
            stride_bytes,
            count,
        }
    }

    pub fn byte_size(&self) -> u32 {
        self.count.saturating_mul(self.stride_bytes)
    }

    pub fn element_offset(&self, index: u32) -> Option<u64> {
        (index < self.count).then(|| index as u64 * self.stride_bytes as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_offsets_respect_length() {
        let sequence = SequenceType::new(TypeId::from_index(0), 4, 5);
        assert_eq!(sequence.byte_size(), 20);
        assert_eq!(sequence.element_offset(4), Some(16), "last element sits at (n - 1) * stride");
        assert_eq!(sequence.element_offset(5), None, "index past the end has no offset");
    }
}
