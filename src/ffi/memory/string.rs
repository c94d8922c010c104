//! Bounded C string reads for pointers of unknown extent.

use super::error::MemoryError;
use super::image::ForeignMemory;

/// Bytes collected by [`scan_c_string`]. The terminator is kept when one was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CStringScan {
    pub bytes: Vec<u8>,
    pub terminated: bool,
    /// The read that ended the scan early, if any.
    pub fault: Option<MemoryError>,
}

impl CStringScan {
    pub fn truncated(&self) -> bool {
        !self.terminated && self.fault.is_none()
    }
}

/// Reads byte by byte from `address` until a nul byte (included) or `max_len` bytes.
/// A failing read stops the scan and keeps whatever was collected before it.
pub fn scan_c_string(memory: &dyn ForeignMemory, address: u64, max_len: usize) -> CStringScan {
    let mut scan = CStringScan::default();
    let mut byte = [0u8; 1];
    for offset in 0..max_len as u64 {
        let Some(cursor) = address.checked_add(offset) else {
            scan.fault = Some(MemoryError::AddressOverflow {
                base: address,
                offset,
            });
            break;
        };
        if let Err(err) = memory.read(cursor, &mut byte) {
            scan.fault = Some(err);
            break;
        }
        scan.bytes.push(byte[0]);
        if byte[0] == 0 {
            scan.terminated = true;
            break;
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::memory::MemoryImage;

    fn prepare_image(bytes: &[u8]) -> MemoryImage {
        let image = MemoryImage::default();
        image.map_bytes("rodata", 0x400, bytes).unwrap();
        image
    }

    #[test]
    fn scan_keeps_the_terminator() {
        let image = prepare_image(b"hello\0world");
        let scan = scan_c_string(&image, 0x400, 255);
        assert_eq!(scan.bytes, b"hello\0", "scan should stop right after the nul byte");
        assert!(scan.terminated);
        assert!(!scan.truncated());
    }

    #[test]
    fn scan_is_capped_without_terminator() {
        let image = prepare_image(&[b'a'; 300]);
        let scan = scan_c_string(&image, 0x400, 255);
        assert_eq!(scan.bytes.len(), 255, "unterminated data is capped at the limit");
        assert!(scan.truncated());
    }

    #[test]
    fn scan_stops_at_unmapped_memory() {
        let image = prepare_image(b"abc");
        let scan = scan_c_string(&image, 0x400, 255);
        assert_eq!(scan.bytes, b"abc");
        assert_eq!(scan.fault, Some(MemoryError::NotMapped { address: 0x403 }));
    }

    #[test]
    fn scan_stops_at_the_top_of_the_address_space() {
        // every address reads as 'x', including u64::MAX
        struct Filled;
        impl ForeignMemory for Filled {
            fn read(&self, _address: u64, out: &mut [u8]) -> crate::ffi::memory::MemoryResult<()> {
                out.fill(b'x');
                Ok(())
            }
        }

        let scan = scan_c_string(&Filled, u64::MAX - 1, 255);
        assert_eq!(scan.bytes, b"xx", "the byte at u64::MAX is still read");
        assert_eq!(
            scan.fault,
            Some(MemoryError::AddressOverflow {
                base: u64::MAX - 1,
                offset: 2
            })
        );
    }

    #[test]
    fn zero_limit_reads_nothing() {
        let image = prepare_image(b"abc");
        let scan = scan_c_string(&image, 0x400, 0);
        assert!(scan.bytes.is_empty());
    }
}
