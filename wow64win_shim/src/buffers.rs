// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Variable-length buffer transcoding
//!
//! Two shapes recur across the entry points:
//! - self-describing records (header plus opaque body) whose size differs
//!   between the widths and is obtained by a two-phase query, handled by
//!   [`RecordLayout`];
//! - homogeneous arrays filled by the native service up to a caller-declared
//!   capacity, handled by [`fill_array`] and [`stage_array`].
//!
//! Conversions never look past what the native service reports as written.

use crate::convert::Transcode;
use crate::layout::RawInputHeader64;
use crate::memory::{self, GuestMemory};
use crate::staging::{StagingBuffer, StagingScope};
use crate::width::NarrowPtr;
use crate::{Result, Wow64Error};
use core::marker::PhantomData;
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes};

/// A record header whose narrow form carries the record's total size
pub trait RecordHeader: Transcode + FromBytes + IntoBytes {
    /// Store the narrow total size in the narrow header.
    fn set_total_size(narrow: &mut Self::Narrow, total: u32);
}

impl RecordHeader for RawInputHeader64 {
    fn set_total_size(narrow: &mut Self::Narrow, total: u32) {
        narrow.dw_size = total;
    }
}

/// Outcome of a record query or fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The native call failed; its result is returned unchanged
    Failed(u32),
    /// Narrow size required (query) or written (fill)
    Bytes(u32),
}

/// Size arithmetic and staging for records with header type `H`
///
/// `narrow_total = narrow_header + body` where
/// `body = native_total - native_header`.
#[derive(Debug, Default)]
pub struct RecordLayout<H>(PhantomData<H>);

impl<H: RecordHeader> RecordLayout<H> {
    pub const NARROW_HEADER: u32 = H::KIND.narrow_size();
    pub const NATIVE_HEADER: u32 = H::KIND.native_size();

    pub fn new() -> Self {
        Self(PhantomData)
    }

    /// Body size of a native record of `native_total` bytes.
    pub fn body_size(native_total: u32) -> Result<u32> {
        native_total.checked_sub(Self::NATIVE_HEADER).ok_or_else(|| {
            Wow64Error::InvalidParameter(format!(
                "native record of {native_total} bytes is shorter than its {} header",
                H::KIND.name()
            ))
        })
    }

    /// Narrow size of a native record of `native_total` bytes.
    pub fn narrow_total(native_total: u32) -> Result<u32> {
        let body = Self::body_size(native_total)?;
        body.checked_add(Self::NARROW_HEADER)
            .ok_or(Wow64Error::Narrowing(u64::from(body)))
    }

    /// Native staging size for a narrow buffer of `capacity` bytes.
    pub fn staging_size(capacity: u32) -> Result<usize> {
        usize::try_from(capacity)
            .ok()
            .and_then(|capacity| capacity.checked_add(Self::NATIVE_HEADER as usize))
            .ok_or(Wow64Error::NoMemory(usize::MAX))
    }

    /// Size query: `call` receives the native size slot and returns the
    /// native result (`~0` on failure).
    pub fn query(&self, call: impl FnOnce(&mut u32) -> u32) -> Result<RecordOutcome> {
        let mut native_total = 0;
        let ret = call(&mut native_total);
        if ret == u32::MAX {
            return Ok(RecordOutcome::Failed(ret));
        }
        Self::narrow_total(native_total).map(RecordOutcome::Bytes)
    }

    /// Fill the narrow buffer at `dest`, `capacity` bytes long.
    ///
    /// `call` receives the native staging buffer and its size slot and
    /// returns the number of native bytes written (`~0` on failure). Nothing
    /// is written to `dest` unless the whole narrow record fits.
    pub fn fill<M>(
        &self,
        staging: &StagingScope,
        mem: &mut M,
        dest: NarrowPtr,
        capacity: u32,
        call: impl FnOnce(&mut [u8], &mut u32) -> u32,
    ) -> Result<RecordOutcome>
    where
        M: GuestMemory + ?Sized,
    {
        let mut native = staging.alloc_scratch::<u8>(Self::staging_size(capacity)?)?;
        let mut native_size = u32::try_from(native.len()).map_err(|_| {
            Wow64Error::InvalidParameter(format!("record buffer of {capacity} bytes"))
        })?;
        let ret = call(&mut native, &mut native_size);
        if ret == u32::MAX {
            return Ok(RecordOutcome::Failed(ret));
        }

        let written = ret as usize;
        if written > native.len() {
            return Err(Wow64Error::InvalidParameter(format!(
                "native service reported {written} bytes for a {} byte buffer",
                native.len()
            )));
        }
        let body = Self::body_size(ret)?;
        let needed = u64::from(Self::NARROW_HEADER) + u64::from(body);
        if needed > u64::from(capacity) {
            return Err(Wow64Error::InsufficientBuffer {
                needed,
                available: capacity,
            });
        }

        let (header, rest) = H::read_from_prefix(&native[..written]).map_err(|_| {
            Wow64Error::InvalidParameter(format!("truncated {} header", H::KIND.name()))
        })?;
        let total = Self::NARROW_HEADER + body;
        let mut narrow = header.to_narrow();
        H::set_total_size(&mut narrow, total);

        // One write, so a fault leaves the caller's buffer untouched
        let mut record = staging.alloc_scratch::<u8>(total as usize)?;
        let (head, tail) = record.split_at_mut(Self::NARROW_HEADER as usize);
        head.copy_from_slice(narrow.as_bytes());
        tail.copy_from_slice(rest);
        mem.write(dest, &record)?;
        Ok(RecordOutcome::Bytes(total))
    }

    /// Fetch only the header of a record into the narrow buffer at `dest`.
    ///
    /// `call` fills the native header and returns the native result.
    pub fn fetch_header<M>(
        &self,
        mem: &mut M,
        dest: NarrowPtr,
        capacity: u32,
        call: impl FnOnce(&mut [u8], &mut u32) -> u32,
    ) -> Result<RecordOutcome>
    where
        M: GuestMemory + ?Sized,
    {
        if capacity < Self::NARROW_HEADER {
            return Err(Wow64Error::InsufficientBuffer {
                needed: u64::from(Self::NARROW_HEADER),
                available: capacity,
            });
        }
        let mut header = H::new_zeroed();
        let mut native_size = Self::NATIVE_HEADER;
        let ret = call(header.as_mut_bytes(), &mut native_size);
        if ret == u32::MAX {
            return Ok(RecordOutcome::Failed(ret));
        }
        memory::write_struct(mem, dest, &header.to_narrow())?;
        Ok(RecordOutcome::Bytes(Self::NARROW_HEADER))
    }
}

/// Result of a native array fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFill {
    /// Native result, returned to the caller unchanged
    pub result: u32,
    /// Elements written, or `None` if the call failed
    pub written: Option<usize>,
}

impl NativeFill {
    pub fn failed(result: u32) -> Self {
        Self {
            result,
            written: None,
        }
    }

    /// The result is the element count, `~0` on failure.
    pub fn counted(result: u32) -> Self {
        if result == u32::MAX {
            Self::failed(result)
        } else {
            Self {
                result,
                written: Some(result as usize),
            }
        }
    }

    /// The result is a signed element count, negative on failure.
    #[allow(clippy::cast_sign_loss)]
    pub fn signed(result: i32) -> Self {
        match usize::try_from(result) {
            Ok(written) => Self {
                result: result as u32,
                written: Some(written),
            },
            Err(_) => Self::failed(result as u32),
        }
    }

    /// The result is an NTSTATUS; the count comes back separately.
    pub fn status(status: u32, written: u32) -> Self {
        if status == 0 {
            Self {
                result: status,
                written: Some(written as usize),
            }
        } else {
            Self::failed(status)
        }
    }
}

/// Outcome of [`fill_array`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayFill<N> {
    Failed(u32),
    Converted { result: u32, items: Vec<N> },
}

impl<N: IntoBytes + Immutable> ArrayFill<N> {
    /// Write the converted items to `dest` and yield the native result.
    pub fn store<M: GuestMemory + ?Sized>(self, mem: &mut M, dest: NarrowPtr) -> Result<u32> {
        match self {
            Self::Failed(result) => Ok(result),
            Self::Converted { result, items } => {
                memory::write_slice(mem, dest, &items)?;
                Ok(result)
            }
        }
    }
}

/// Stage `capacity` native elements, let `call` fill them, and narrow the
/// elements it reports written.
pub fn fill_array<T>(
    staging: &StagingScope,
    capacity: usize,
    call: impl FnOnce(&mut [T]) -> NativeFill,
) -> Result<ArrayFill<T::Narrow>>
where
    T: Transcode + FromBytes + IntoBytes,
{
    let mut native = staging.alloc_scratch::<T>(capacity)?;
    let fill = call(&mut native);
    let Some(written) = fill.written else {
        return Ok(ArrayFill::Failed(fill.result));
    };
    let items = native.iter().take(written).map(T::to_narrow).collect();
    Ok(ArrayFill::Converted {
        result: fill.result,
        items,
    })
}

/// Read `count` narrow elements at `ptr` and stage their native forms.
pub fn stage_array<'s, T, M>(
    staging: &'s StagingScope,
    mem: &M,
    ptr: NarrowPtr,
    count: usize,
) -> Result<StagingBuffer<'s, T>>
where
    T: Transcode + FromZeros,
    M: GuestMemory + ?Sized,
{
    let mut narrow = staging.alloc_zeroed::<T::Narrow>(count)?;
    memory::read_slice_into(mem, ptr, &mut narrow)?;
    let mut native = staging.alloc_zeroed::<T>(count)?;
    for (slot, item) in native.iter_mut().zip(narrow.iter()) {
        *slot = T::to_native(item);
    }
    Ok(native)
}
