// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Handle and pointer values at both address widths
//!
//! Narrow values are what the 32-bit client stores; native values are what the
//! 64-bit service consumes. Widening is always exact. Narrowing truncates and is
//! checked: debug builds assert that nothing was lost, [`NativeHandle::try_narrow`]
//! reports it as an error.

use crate::{Result, Wow64Error};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Handle as stored by the narrow client
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NarrowHandle(pub u32);

/// Address in the narrow client's address space
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NarrowPtr(pub u32);

/// Handle as consumed by the native service
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NativeHandle(pub u64);

/// Native-width address
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NativePtr(pub u64);

impl NarrowHandle {
    pub const NULL: Self = Self(0);

    /// Widen a handle stored in a structure field.
    pub fn zero_extend(self) -> NativeHandle {
        NativeHandle(u64::from(self.0))
    }

    /// Widen a handle passed as an argument, keeping pseudo-handles such as
    /// `-1` intact.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn sign_extend(self) -> NativeHandle {
        NativeHandle(i64::from(self.0 as i32) as u64)
    }
}

impl From<NarrowHandle> for NativeHandle {
    fn from(handle: NarrowHandle) -> Self {
        handle.zero_extend()
    }
}

impl NativeHandle {
    pub const NULL: Self = Self(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Whether the handle survives truncation to 32 bits, either as a
    /// zero-extended value or as a sign-extended pseudo-handle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fits_narrow(self) -> bool {
        let low = NarrowHandle(self.0 as u32);
        self == low.zero_extend() || self == low.sign_extend()
    }

    /// Truncate to narrow width, failing if bits would be lost.
    pub fn try_narrow(self) -> Result<NarrowHandle> {
        if self.fits_narrow() {
            Ok(self.narrow_unchecked())
        } else {
            Err(Wow64Error::Narrowing(self.0))
        }
    }

    /// Truncate to narrow width.
    ///
    /// Live handles always fit; debug builds assert it.
    pub fn narrow(self) -> NarrowHandle {
        debug_assert!(
            self.fits_narrow(),
            "handle 0x{:X} does not fit the narrow width",
            self.0
        );
        self.narrow_unchecked()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn narrow_unchecked(self) -> NarrowHandle {
        NarrowHandle(self.0 as u32)
    }
}

impl NarrowPtr {
    pub const NULL: Self = Self(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The same address at native width.
    pub fn widen(self) -> NativePtr {
        NativePtr(u64::from(self.0))
    }

    /// Address `bytes` further on, or `None` past the end of the narrow space.
    pub fn offset(self, bytes: usize) -> Option<Self> {
        let bytes = u32::try_from(bytes).ok()?;
        self.0.checked_add(bytes).map(Self)
    }
}

impl From<NarrowPtr> for NativePtr {
    fn from(ptr: NarrowPtr) -> Self {
        ptr.widen()
    }
}

impl NativePtr {
    pub const NULL: Self = Self(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn fits_narrow(self) -> bool {
        self.0 >> 32 == 0
    }

    pub fn try_narrow(self) -> Result<NarrowPtr> {
        u32::try_from(self.0)
            .map(NarrowPtr)
            .map_err(|_| Wow64Error::Narrowing(self.0))
    }

    /// Truncate to narrow width; debug builds assert nothing is lost.
    #[allow(clippy::cast_possible_truncation)]
    pub fn narrow(self) -> NarrowPtr {
        debug_assert!(
            self.fits_narrow(),
            "pointer 0x{:X} is outside the narrow address space",
            self.0
        );
        NarrowPtr(self.0 as u32)
    }
}

/// Truncate a pointer-sized scalar result (timer ids, context values).
///
/// Same representability rule as handles.
pub fn narrow_uint_ptr(value: u64) -> u32 {
    NativeHandle(value).narrow().0
}

/// Truncate a pointer-sized data field that the client only stores and
/// hands back (item data, extra info).
#[allow(clippy::cast_possible_truncation)]
pub fn truncate_uint_ptr(value: u64) -> u32 {
    value as u32
}
