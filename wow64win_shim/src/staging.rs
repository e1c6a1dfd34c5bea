// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Per-call staging arena
//!
//! Every entry point opens one [`StagingScope`] and takes its native-layout
//! scratch buffers from it. A [`StagingBuffer`] borrows its scope, so no buffer
//! can outlive the call that staged it, and each buffer hands its bytes back to
//! the scope budget when dropped, on every exit path.

use crate::{Result, Wow64Error};
use core::cell::Cell;
use core::ops::{Deref, DerefMut};
use zerocopy::{FromBytes, FromZeros, IntoBytes};

/// Default per-call staging budget
pub const DEFAULT_STAGING_LIMIT: usize = 16 * 1024 * 1024;

/// Staging arena configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingConfig {
    /// Maximum bytes live in one scope at any time
    pub limit_bytes: usize,
    /// Byte written into scratch (non-zeroed) buffers
    pub fill: u8,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            limit_bytes: DEFAULT_STAGING_LIMIT,
            fill: 0,
        }
    }
}

impl StagingConfig {
    /// Set the per-scope byte budget
    #[must_use]
    pub fn with_limit(mut self, limit_bytes: usize) -> Self {
        self.limit_bytes = limit_bytes;
        self
    }

    /// Set the byte scratch buffers are filled with
    ///
    /// Tests use a poison value here to catch reads of memory the native
    /// service never wrote.
    #[must_use]
    pub fn with_fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }
}

/// Staging arena for one entry-point invocation
#[derive(Debug)]
pub struct StagingScope {
    config: StagingConfig,
    in_use: Cell<usize>,
    peak: Cell<usize>,
}

impl StagingScope {
    pub fn new(config: StagingConfig) -> Self {
        Self {
            config,
            in_use: Cell::new(0),
            peak: Cell::new(0),
        }
    }

    /// Stage `count` zero-initialized elements.
    pub fn alloc_zeroed<T: FromZeros>(&self, count: usize) -> Result<StagingBuffer<'_, T>> {
        let bytes = self.reserve::<T>(count)?;
        let mut data = Vec::new();
        if data.try_reserve_exact(count).is_err() {
            self.release(bytes);
            return Err(Wow64Error::NoMemory(bytes));
        }
        data.resize_with(count, T::new_zeroed);
        Ok(StagingBuffer {
            scope: self,
            data,
            bytes,
        })
    }

    /// Stage `count` elements whose contents are unspecified.
    ///
    /// Callers must only read back what they or the native service wrote.
    pub fn alloc_scratch<T: FromBytes + IntoBytes>(
        &self,
        count: usize,
    ) -> Result<StagingBuffer<'_, T>> {
        let mut buffer = self.alloc_zeroed::<T>(count)?;
        if self.config.fill != 0 {
            buffer.data.as_mut_slice().as_mut_bytes().fill(self.config.fill);
        }
        Ok(buffer)
    }

    /// Bytes currently staged
    pub fn in_use(&self) -> usize {
        self.in_use.get()
    }

    /// Largest number of bytes staged at once
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    fn reserve<T>(&self, count: usize) -> Result<usize> {
        let bytes = count
            .checked_mul(core::mem::size_of::<T>())
            .ok_or(Wow64Error::NoMemory(usize::MAX))?;
        let total = self
            .in_use
            .get()
            .checked_add(bytes)
            .filter(|&total| total <= self.config.limit_bytes)
            .ok_or(Wow64Error::NoMemory(bytes))?;
        self.in_use.set(total);
        self.peak.set(self.peak.get().max(total));
        Ok(bytes)
    }

    fn release(&self, bytes: usize) {
        self.in_use.set(self.in_use.get() - bytes);
    }
}

/// A native-layout buffer owned by one staging scope
#[derive(Debug)]
pub struct StagingBuffer<'s, T> {
    scope: &'s StagingScope,
    data: Vec<T>,
    bytes: usize,
}

impl<T> Deref for StagingBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for StagingBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Drop for StagingBuffer<'_, T> {
    fn drop(&mut self) {
        self.scope.release(self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_allocation() {
        let scope = StagingScope::new(StagingConfig::default().with_fill(0xCD));
        let buffer = scope.alloc_zeroed::<u64>(4).unwrap();
        assert_eq!(&*buffer, &[0, 0, 0, 0]);
        assert_eq!(scope.in_use(), 32);
    }

    #[test]
    fn test_scratch_allocation_is_filled() {
        let scope = StagingScope::new(StagingConfig::default().with_fill(0xCD));
        let buffer = scope.alloc_scratch::<u32>(2).unwrap();
        assert_eq!(&*buffer, &[0xCDCD_CDCD, 0xCDCD_CDCD]);
    }

    #[test]
    fn test_budget_is_enforced() {
        let scope = StagingScope::new(StagingConfig::default().with_limit(64));
        let first = scope.alloc_zeroed::<u8>(48).unwrap();
        assert_eq!(
            scope.alloc_zeroed::<u8>(17).unwrap_err(),
            Wow64Error::NoMemory(17)
        );
        drop(first);
        assert_eq!(scope.in_use(), 0);
        assert!(scope.alloc_zeroed::<u8>(64).is_ok());
        assert_eq!(scope.peak(), 64);
    }

    #[test]
    fn test_overflowing_count_fails() {
        let scope = StagingScope::new(StagingConfig::default());
        assert!(matches!(
            scope.alloc_zeroed::<u64>(usize::MAX / 4),
            Err(Wow64Error::NoMemory(_))
        ));
        assert_eq!(scope.in_use(), 0);
    }

    #[test]
    fn test_buffers_released_on_early_return() {
        fn stage_then_fail(scope: &StagingScope) -> Result<()> {
            let _header = scope.alloc_zeroed::<u8>(24)?;
            let _body = scope.alloc_scratch::<u8>(100)?;
            Err(Wow64Error::InvalidParameter("late check".to_string()))
        }

        let scope = StagingScope::new(StagingConfig::default());
        assert!(stage_then_fail(&scope).is_err());
        assert_eq!(scope.in_use(), 0);
        assert_eq!(scope.peak(), 124);
    }
}
