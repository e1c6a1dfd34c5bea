// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Error types and the values reported to the narrow client on failure

use thiserror::Error;

/// Failures detected by the translation layer itself.
///
/// Native service failures are never represented here: their result codes are
/// forwarded to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Wow64Error {
    #[error("{kind}: declared size {declared}, expected {expected}")]
    SizeMismatch {
        kind: &'static str,
        declared: u32,
        expected: u32,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient buffer: {needed} bytes needed, {available} available")]
    InsufficientBuffer { needed: u64, available: u32 },

    #[error("staging allocation of {0} bytes failed")]
    NoMemory(usize),

    #[error("access violation at narrow address 0x{0:08X}")]
    AccessViolation(u32),

    #[error("native value 0x{0:X} does not fit the narrow address width")]
    Narrowing(u64),
}

pub type Result<T> = core::result::Result<T, Wow64Error>;

/// Last-error codes set for the narrow client
pub mod last_error {
    pub const ERROR_SUCCESS: u32 = 0;
    pub const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
    pub const ERROR_INVALID_PARAMETER: u32 = 87;
    pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
    pub const ERROR_ARITHMETIC_OVERFLOW: u32 = 534;
}

/// NTSTATUS values produced by this layer
pub mod status {
    pub const STATUS_SUCCESS: u32 = 0x0000_0000;
    pub const STATUS_ACCESS_VIOLATION: u32 = 0xC000_0005;
    pub const STATUS_INVALID_PARAMETER: u32 = 0xC000_000D;
    pub const STATUS_NO_MEMORY: u32 = 0xC000_0017;
    pub const STATUS_BUFFER_TOO_SMALL: u32 = 0xC000_0023;
    pub const STATUS_INTEGER_OVERFLOW: u32 = 0xC000_0095;
    pub const STATUS_NOT_SUPPORTED: u32 = 0xC000_00BB;
}

impl Wow64Error {
    /// The last-error code reported for this failure, if any.
    ///
    /// Access violations leave the last error alone, the same way a fault
    /// caught at the call boundary would.
    pub fn last_error_code(&self) -> Option<u32> {
        match self {
            Self::SizeMismatch { .. } | Self::InvalidParameter(_) => {
                Some(last_error::ERROR_INVALID_PARAMETER)
            }
            Self::InsufficientBuffer { .. } => Some(last_error::ERROR_INSUFFICIENT_BUFFER),
            Self::NoMemory(_) => Some(last_error::ERROR_NOT_ENOUGH_MEMORY),
            Self::Narrowing(_) => Some(last_error::ERROR_ARITHMETIC_OVERFLOW),
            Self::AccessViolation(_) => None,
        }
    }

    /// The NTSTATUS equivalent of this failure.
    pub fn status(&self) -> u32 {
        match self {
            Self::SizeMismatch { .. } | Self::InvalidParameter(_) => {
                status::STATUS_INVALID_PARAMETER
            }
            Self::InsufficientBuffer { .. } => status::STATUS_BUFFER_TOO_SMALL,
            Self::NoMemory(_) => status::STATUS_NO_MEMORY,
            Self::AccessViolation(_) => status::STATUS_ACCESS_VIOLATION,
            Self::Narrowing(_) => status::STATUS_INTEGER_OVERFLOW,
        }
    }
}

/// How an entry point signals failure through its return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReturn {
    /// `FALSE`, or a null handle
    False,
    /// `~0u`, also used for `WAIT_FAILED` and `-1` counts
    AllOnes,
    /// An NTSTATUS describing the failure
    Status,
}

impl FailureReturn {
    /// The narrow return value for `err`.
    pub fn sentinel(self, err: &Wow64Error) -> u32 {
        if let Wow64Error::AccessViolation(_) = err {
            return status::STATUS_ACCESS_VIOLATION;
        }
        match self {
            Self::False => 0,
            Self::AllOnes => u32::MAX,
            Self::Status => err.status(),
        }
    }
}

/// Process-visible last-error channel of the calling thread
pub trait LastErrorSink {
    /// Set the last-error code seen by the narrow client
    fn set_last_error(&mut self, code: u32);

    /// Current last-error code
    fn last_error(&self) -> u32;
}

/// Report `err` through `sink` and produce the value the entry point returns.
pub fn report(sink: &mut dyn LastErrorSink, failure: FailureReturn, err: &Wow64Error) -> u32 {
    if let Some(code) = err.last_error_code() {
        sink.set_last_error(code);
    }
    failure.sentinel(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sink(u32);

    impl LastErrorSink for Sink {
        fn set_last_error(&mut self, code: u32) {
            self.0 = code;
        }

        fn last_error(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_sentinels_per_result_kind() {
        let err = Wow64Error::InvalidParameter("count".to_string());
        assert_eq!(FailureReturn::False.sentinel(&err), 0);
        assert_eq!(FailureReturn::AllOnes.sentinel(&err), u32::MAX);
        assert_eq!(
            FailureReturn::Status.sentinel(&err),
            status::STATUS_INVALID_PARAMETER
        );
        assert_eq!(
            FailureReturn::Status.sentinel(&Wow64Error::NoMemory(64)),
            status::STATUS_NO_MEMORY
        );
    }

    #[test]
    fn test_access_violation_ignores_result_kind() {
        let err = Wow64Error::AccessViolation(0x10);
        for kind in [FailureReturn::False, FailureReturn::AllOnes, FailureReturn::Status] {
            assert_eq!(kind.sentinel(&err), status::STATUS_ACCESS_VIOLATION);
        }
    }

    #[test]
    fn test_report_sets_last_error() {
        let mut sink = Sink(0);
        let err = Wow64Error::InsufficientBuffer {
            needed: 40,
            available: 39,
        };
        assert_eq!(report(&mut sink, FailureReturn::AllOnes, &err), u32::MAX);
        assert_eq!(sink.last_error(), last_error::ERROR_INSUFFICIENT_BUFFER);

        let mut sink = Sink(7);
        report(&mut sink, FailureReturn::False, &Wow64Error::AccessViolation(0));
        assert_eq!(sink.last_error(), 7);
    }
}
