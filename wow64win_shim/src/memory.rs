// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Access to the narrow client's address space
//!
//! Structures are moved in and out as raw bytes; the typed helpers below
//! reinterpret them through `zerocopy`, never through pointer casts.

use crate::Result;
use crate::width::NarrowPtr;
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// The narrow client's address space
///
/// Unmapped or out-of-range accesses fail with
/// [`Wow64Error::AccessViolation`](crate::Wow64Error::AccessViolation).
pub trait GuestMemory {
    /// Copy `buf.len()` bytes starting at `addr` into `buf`
    fn read(&self, addr: NarrowPtr, buf: &mut [u8]) -> Result<()>;

    /// Copy `data` to `addr`
    fn write(&mut self, addr: NarrowPtr, data: &[u8]) -> Result<()>;
}

/// Read one `u32` (counts, sizes).
pub fn read_u32<M: GuestMemory + ?Sized>(mem: &M, addr: NarrowPtr) -> Result<u32> {
    read_struct(mem, addr)
}

/// Write one `u32`.
pub fn write_u32<M: GuestMemory + ?Sized>(mem: &mut M, addr: NarrowPtr, value: u32) -> Result<()> {
    write_struct(mem, addr, &value)
}

/// Read a narrow structure.
pub fn read_struct<T, M>(mem: &M, addr: NarrowPtr) -> Result<T>
where
    T: FromBytes + IntoBytes,
    M: GuestMemory + ?Sized,
{
    let mut value = T::new_zeroed();
    mem.read(addr, value.as_mut_bytes())?;
    Ok(value)
}

/// Write a narrow structure.
pub fn write_struct<T, M>(mem: &mut M, addr: NarrowPtr, value: &T) -> Result<()>
where
    T: IntoBytes + Immutable,
    M: GuestMemory + ?Sized,
{
    mem.write(addr, value.as_bytes())
}

/// Fill `out` from consecutive narrow elements at `addr`.
pub fn read_slice_into<T, M>(mem: &M, addr: NarrowPtr, out: &mut [T]) -> Result<()>
where
    T: FromBytes + IntoBytes,
    M: GuestMemory + ?Sized,
{
    if out.is_empty() {
        return Ok(());
    }
    mem.read(addr, out.as_mut_bytes())
}

/// Write consecutive narrow elements to `addr`.
pub fn write_slice<T, M>(mem: &mut M, addr: NarrowPtr, items: &[T]) -> Result<()>
where
    T: IntoBytes + Immutable,
    M: GuestMemory + ?Sized,
{
    if items.is_empty() {
        return Ok(());
    }
    mem.write(addr, items.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Wow64Error;
    use crate::layout::{Point, RawInputDeviceList32};
    use crate::width::NarrowHandle;

    /// Bytes mapped at 0x1000..0x1000+len
    struct Window(Vec<u8>);

    impl Window {
        fn range(&self, addr: NarrowPtr, len: usize) -> Result<core::ops::Range<usize>> {
            let start = (addr.0 as usize)
                .checked_sub(0x1000)
                .ok_or(Wow64Error::AccessViolation(addr.0))?;
            let end = start + len;
            if end > self.0.len() {
                return Err(Wow64Error::AccessViolation(addr.0));
            }
            Ok(start..end)
        }
    }

    impl GuestMemory for Window {
        fn read(&self, addr: NarrowPtr, buf: &mut [u8]) -> Result<()> {
            let range = self.range(addr, buf.len())?;
            buf.copy_from_slice(&self.0[range]);
            Ok(())
        }

        fn write(&mut self, addr: NarrowPtr, data: &[u8]) -> Result<()> {
            let range = self.range(addr, data.len())?;
            self.0[range].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_scalar_access() {
        let mut mem = Window(vec![0; 64]);
        write_u32(&mut mem, NarrowPtr(0x1008), 0xDEAD_BEEF).unwrap();
        assert_eq!(read_u32(&mem, NarrowPtr(0x1008)).unwrap(), 0xDEAD_BEEF);
        assert_eq!(mem.0[8..12], [0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_struct_and_slice_access() {
        let mut mem = Window(vec![0; 64]);
        write_struct(&mut mem, NarrowPtr(0x1000), &Point { x: -3, y: 9 }).unwrap();
        let pt: Point = read_struct(&mem, NarrowPtr(0x1000)).unwrap();
        assert_eq!(pt, Point { x: -3, y: 9 });

        let list = [
            RawInputDeviceList32 {
                h_device: NarrowHandle(0x10),
                dw_type: 0,
            },
            RawInputDeviceList32 {
                h_device: NarrowHandle(0x20),
                dw_type: 1,
            },
        ];
        write_slice(&mut mem, NarrowPtr(0x1010), &list).unwrap();
        let mut back = [RawInputDeviceList32::default(); 2];
        read_slice_into(&mem, NarrowPtr(0x1010), &mut back).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_fault_propagates() {
        let mem = Window(vec![0; 16]);
        assert_eq!(
            read_u32(&mem, NarrowPtr(0)),
            Err(Wow64Error::AccessViolation(0))
        );
        assert_eq!(
            read_u32(&mem, NarrowPtr(0x100E)),
            Err(Wow64Error::AccessViolation(0x100E))
        );
    }

    #[test]
    fn test_empty_slices_never_touch_memory() {
        let mut mem = Window(Vec::new());
        let mut none: [u32; 0] = [];
        assert!(read_slice_into(&mem, NarrowPtr::NULL, &mut none).is_ok());
        assert!(write_slice::<u32, _>(&mut mem, NarrowPtr::NULL, &[]).is_ok());
    }
}
