pub const MAX_ENDIAN_BYTES: usize = 16;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    #[inline(always)]
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    /// Folds up to 16 bytes into an integer. Longer input keeps only the first 16 bytes.
    #[inline(always)]
    pub fn decode_bytes(self, bytes: &[u8]) -> u128 {
        let bytes = &bytes[..bytes.len().min(MAX_ENDIAN_BYTES)];
        if bytes.is_empty() {
            return 0;
        }
        let mut buf = [0u8; MAX_ENDIAN_BYTES];
        match self {
            Endianness::Little => {
                buf[..bytes.len()].copy_from_slice(bytes);
                u128::from_le_bytes(buf)
            }
            Endianness::Big => {
                let start = MAX_ENDIAN_BYTES - bytes.len();
                buf[start..].copy_from_slice(bytes);
                u128::from_be_bytes(buf)
            }
        }
    }

    /// Lays out the low `byte_len` bytes of `value` in memory order.
    pub fn encode(self, value: u128, byte_len: usize) -> Vec<u8> {
        let byte_len = byte_len.min(MAX_ENDIAN_BYTES);
        match self {
            Endianness::Little => value.to_le_bytes()[..byte_len].to_vec(),
            Endianness::Big => value.to_be_bytes()[MAX_ENDIAN_BYTES - byte_len..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_respects_byte_order() {
        assert_eq!(Endianness::Little.decode_bytes(&[0x34, 0x12]), 0x1234);
        assert_eq!(Endianness::Big.decode_bytes(&[0x12, 0x34]), 0x1234);
        assert_eq!(Endianness::Little.decode_bytes(&[]), 0, "empty input decodes to zero");
    }

    #[test]
    fn encode_is_the_inverse_of_decode() {
        for endian in [Endianness::Little, Endianness::Big] {
            let bytes = endian.encode(0xDEAD_BEEF, 4);
            assert_eq!(bytes.len(), 4);
            assert_eq!(endian.decode_bytes(&bytes), 0xDEAD_BEEF, "{endian:?} should round-trip");
        }
    }
}
