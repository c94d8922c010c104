//! Foreign memory access. `ForeignMemory` is the read surface the formatter consumes;
//! `MemoryImage` is an in-process stand-in made of mapped byte regions.

use std::sync::{PoisonError, RwLock};

use super::endianness::Endianness;
use super::error::{MemoryError, MemoryResult};

pub trait ForeignMemory: Send + Sync {
    fn endianness(&self) -> Endianness {
        Endianness::native()
    }

    /// Copies `out.len()` bytes starting at `address`.
    fn read(&self, address: u64, out: &mut [u8]) -> MemoryResult<()>;
}

#[derive(Debug)]
struct Region {
    base: u64,
    bytes: Vec<u8>,
}

impl Region {
    fn end(&self) -> u64 {
        self.base + self.bytes.len() as u64
    }

    fn contains(&self, address: u64) -> bool {
        self.base <= address && address < self.end()
    }

    fn overlaps(&self, base: u64, end: u64) -> bool {
        self.base < end && base < self.end()
    }

    fn window(&self, address: u64, len: usize) -> MemoryResult<std::ops::Range<usize>> {
        let start = (address - self.base) as usize;
        match start.checked_add(len) {
            Some(stop) if stop <= self.bytes.len() => Ok(start..stop),
            _ => Err(MemoryError::OutOfRange {
                address,
                len: len as u64,
                end: self.end(),
            }),
        }
    }
}

/// A sparse address space. Regions never overlap and are kept sorted by base address.
#[derive(Debug)]
pub struct MemoryImage {
    regions: RwLock<Vec<Region>>,
    endian: Endianness,
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new(Endianness::native())
    }
}

impl MemoryImage {
    pub fn new(endian: Endianness) -> Self {
        Self {
            regions: RwLock::new(Vec::new()),
            endian,
        }
    }

    /// Maps `size` zeroed bytes at `base`.
    pub fn map(&self, name: impl Into<String>, base: u64, size: usize) -> MemoryResult<()> {
        self.map_bytes(name, base, &vec![0u8; size])
    }

    /// Maps a copy of `bytes` at `base`. The region must end at or below `u64::MAX`.
    pub fn map_bytes(&self, name: impl Into<String>, base: u64, bytes: &[u8]) -> MemoryResult<()> {
        let name = name.into();
        let len = bytes.len() as u64;
        let end = base
            .checked_add(len)
            .ok_or(MemoryError::AddressOverflow { base, offset: len })?;
        let mut regions = self.regions.write().unwrap_or_else(PoisonError::into_inner);
        if regions.iter().any(|region| region.overlaps(base, end)) {
            return Err(MemoryError::Overlap { name, base });
        }
        let pos = regions.partition_point(|region| region.base < base);
        regions.insert(
            pos,
            Region {
                base,
                bytes: bytes.to_vec(),
            },
        );
        Ok(())
    }

    pub fn write(&self, address: u64, data: &[u8]) -> MemoryResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        let mut regions = self.regions.write().unwrap_or_else(PoisonError::into_inner);
        let region = Self::locate_mut(&mut regions, address)?;
        let window = region.window(address, data.len())?;
        region.bytes[window].copy_from_slice(data);
        Ok(())
    }

    /// Stores the low `byte_len` bytes of `value` using the image's byte order.
    pub fn write_uint(&self, address: u64, value: u128, byte_len: usize) -> MemoryResult<()> {
        self.write(address, &self.endian.encode(value, byte_len))
    }

    fn locate(regions: &[Region], address: u64) -> MemoryResult<&Region> {
        let pos = regions.partition_point(|region| region.base <= address);
        pos.checked_sub(1)
            .map(|idx| &regions[idx])
            .filter(|region| region.contains(address))
            .ok_or(MemoryError::NotMapped { address })
    }

    fn locate_mut(regions: &mut [Region], address: u64) -> MemoryResult<&mut Region> {
        let pos = regions.partition_point(|region| region.base <= address);
        pos.checked_sub(1)
            .map(|idx| &mut regions[idx])
            .filter(|region| region.contains(address))
            .ok_or(MemoryError::NotMapped { address })
    }
}

impl ForeignMemory for MemoryImage {
    fn endianness(&self) -> Endianness {
        self.endian
    }

    fn read(&self, address: u64, out: &mut [u8]) -> MemoryResult<()> {
        if out.is_empty() {
            return Ok(());
        }
        let regions = self.regions.read().unwrap_or_else(PoisonError::into_inner);
        let region = Self::locate(&regions, address)?;
        let window = region.window(address, out.len())?;
        out.copy_from_slice(&region.bytes[window]);
        Ok(())
    }
}
