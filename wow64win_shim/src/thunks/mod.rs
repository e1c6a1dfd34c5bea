// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Entry points
//!
//! One function per native service call. Each decodes its slots in order,
//! validates what can be validated without the service, stages and converts
//! input, makes exactly one service call and converts output back. The
//! service's result is returned unchanged.
//!
//! Failures detected here are returned as [`Wow64Error`](crate::Wow64Error);
//! the dispatcher turns them into the entry point's failure value.

pub mod clipboard;
pub mod desktop;
pub mod input;
pub mod menu;
pub mod message;
pub mod raw_input;
pub mod window;

use crate::Result;
use crate::error::LastErrorSink;
use crate::frame::CallFrame;
use crate::memory::GuestMemory;
use crate::service::Win32uService;
use crate::staging::{StagingConfig, StagingScope};
use crate::width::NativeHandle;

/// Everything an entry point may touch during one call
pub struct ThunkContext<'a> {
    /// The narrow client's address space
    pub memory: &'a mut dyn GuestMemory,
    /// The native service
    pub service: &'a mut dyn Win32uService,
    /// Last-error channel of the calling thread
    pub last_error: &'a mut dyn LastErrorSink,
    /// Configuration for per-call staging scopes
    pub staging: StagingConfig,
}

impl<'a> ThunkContext<'a> {
    pub fn new(
        memory: &'a mut dyn GuestMemory,
        service: &'a mut dyn Win32uService,
        last_error: &'a mut dyn LastErrorSink,
    ) -> Self {
        Self {
            memory,
            service,
            last_error,
            staging: StagingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_staging(mut self, staging: StagingConfig) -> Self {
        self.staging = staging;
        self
    }

    /// A fresh staging scope for this call
    pub fn staging(&self) -> StagingScope {
        StagingScope::new(self.staging)
    }
}

/// Signature shared by every entry point
pub type ThunkFn = fn(&mut ThunkContext<'_>, &mut CallFrame<'_>) -> Result<u32>;

/// Narrow a handle result.
fn handle_result(handle: NativeHandle) -> u32 {
    handle.narrow().0
}

/// Reinterpret a signed result as the narrow return register.
#[allow(clippy::cast_sign_loss)]
fn signed_result(value: i32) -> u32 {
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_encodings() {
        assert_eq!(handle_result(NativeHandle(0x0002_0010)), 0x0002_0010);
        assert_eq!(handle_result(NativeHandle(u64::MAX)), u32::MAX);
        assert_eq!(signed_result(-1), u32::MAX);
        assert_eq!(signed_result(5), 5);
    }
}
