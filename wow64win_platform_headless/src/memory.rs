// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Flat narrow address space

use crate::{PlatformError, Result};
use core::ops::Range;
use wow64win_shim::width::NarrowPtr;
use wow64win_shim::{GuestMemory, Wow64Error};
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Granularity of the unmapped guard region
pub const PAGE_SIZE: u32 = 0x1000;

/// One contiguous mapping `[base, base + size)` of the narrow address space
///
/// Everything outside the mapping, including the null page, faults.
#[derive(Debug, Clone)]
pub struct FlatGuestMemory {
    base: u32,
    bytes: Vec<u8>,
}

impl FlatGuestMemory {
    /// Map `size` zeroed bytes at `base`.
    ///
    /// `base` must leave at least one page unmapped below it and the mapping
    /// must end inside the narrow address space.
    pub fn new(base: u32, size: usize) -> Result<Self> {
        let fits = u32::try_from(size)
            .ok()
            .and_then(|size| base.checked_add(size))
            .is_some();
        if base < PAGE_SIZE || size == 0 || !fits {
            return Err(PlatformError::BadRegion { base, size });
        }
        Ok(Self {
            base,
            bytes: vec![0; size],
        })
    }

    /// First mapped address
    pub fn base(&self) -> NarrowPtr {
        NarrowPtr(self.base)
    }

    /// Mapped size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Address `offset` bytes into the mapping
    pub fn at(&self, offset: u32) -> NarrowPtr {
        NarrowPtr(self.base.wrapping_add(offset))
    }

    fn range(&self, addr: NarrowPtr, len: usize) -> Option<Range<usize>> {
        let start = addr.0.checked_sub(self.base)? as usize;
        let end = start.checked_add(len)?;
        (end <= self.bytes.len()).then_some(start..end)
    }

    /// Copy `data` into the mapping.
    pub fn load(&mut self, addr: NarrowPtr, data: &[u8]) -> Result<()> {
        let range = self.range(addr, data.len()).ok_or(PlatformError::OutOfRange {
            addr: addr.0,
            len: data.len(),
        })?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Copy `len` bytes out of the mapping.
    pub fn dump(&self, addr: NarrowPtr, len: usize) -> Result<&[u8]> {
        let range = self
            .range(addr, len)
            .ok_or(PlatformError::OutOfRange { addr: addr.0, len })?;
        Ok(&self.bytes[range])
    }

    /// Store a structure image at `addr`.
    pub fn place<T: IntoBytes + Immutable>(&mut self, addr: NarrowPtr, value: &T) -> Result<()> {
        self.load(addr, value.as_bytes())
    }

    /// Read a structure image from `addr`.
    pub fn fetch<T: FromBytes>(&self, addr: NarrowPtr) -> Result<T> {
        let bytes = self.dump(addr, size_of::<T>())?;
        T::read_from_bytes(bytes).map_err(|_| PlatformError::OutOfRange {
            addr: addr.0,
            len: size_of::<T>(),
        })
    }
}

impl GuestMemory for FlatGuestMemory {
    fn read(&self, addr: NarrowPtr, buf: &mut [u8]) -> wow64win_shim::Result<()> {
        let range = self
            .range(addr, buf.len())
            .ok_or(Wow64Error::AccessViolation(addr.0))?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, addr: NarrowPtr, data: &[u8]) -> wow64win_shim::Result<()> {
        let range = self
            .range(addr, data.len())
            .ok_or(Wow64Error::AccessViolation(addr.0))?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_validation() {
        assert!(FlatGuestMemory::new(0x1_0000, 0x1000).is_ok());
        assert_eq!(
            FlatGuestMemory::new(0, 0x1000).unwrap_err(),
            PlatformError::BadRegion {
                base: 0,
                size: 0x1000
            }
        );
        assert!(FlatGuestMemory::new(0xFFFF_F000, 0x2000).is_err());
        assert!(FlatGuestMemory::new(0x1_0000, 0).is_err());
    }

    #[test]
    fn test_null_and_edges_fault() {
        let mut mem = FlatGuestMemory::new(0x1_0000, 0x100).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(
            mem.read(NarrowPtr(0), &mut buf),
            Err(Wow64Error::AccessViolation(0))
        );
        assert!(mem.read(mem.at(0xFC), &mut buf).is_ok());
        assert!(mem.read(mem.at(0xFD), &mut buf).is_err());
        assert!(mem.write(NarrowPtr(0xFFFF_FFFF), &buf).is_err());
    }

    #[test]
    fn test_place_and_fetch() {
        let mut mem = FlatGuestMemory::new(0x1_0000, 0x100).unwrap();
        mem.place(mem.at(8), &0xDEAD_BEEFu32).unwrap();
        assert_eq!(mem.fetch::<u32>(mem.at(8)).unwrap(), 0xDEAD_BEEF);
        assert_eq!(mem.dump(mem.at(8), 2).unwrap(), &[0xEF, 0xBE]);
        assert!(mem.load(mem.at(0xFF), &[1, 2]).is_err());
    }
}
