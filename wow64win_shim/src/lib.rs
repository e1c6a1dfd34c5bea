// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Narrow-to-native call translation for the win32u window/input service.
//!
//! A 32-bit client calls into a 64-bit service through this crate. Every entry
//! point takes a frame of 32-bit argument slots, rebuilds the native argument
//! list, invokes the service through [`service::Win32uService`], and writes any
//! pointer-bearing output back in narrow layout.
//!
//! The pieces, leaf first:
//! - [`frame`]: sequential decoding of the argument slots
//! - [`staging`]: the per-call scratch arena
//! - [`layout`] and [`convert`]: fixed structures at both widths and their transcoders
//! - [`buffers`]: variable-length records and arrays
//! - [`thunks`], [`table`] and [`dispatch`]: the entry points and how they are invoked
//! - [`tracing`]: call tracing at the entry-point boundary

pub mod buffers;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod layout;
pub mod memory;
pub mod service;
pub mod staging;
pub mod table;
pub mod thunks;
pub mod tracing;
pub mod width;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use dispatch::{DispatchError, Dispatcher};
pub use error::{FailureReturn, LastErrorSink, Result, Wow64Error};
pub use memory::GuestMemory;
pub use service::Win32uService;
pub use staging::{StagingConfig, StagingScope};
pub use thunks::ThunkContext;
pub use width::{NarrowHandle, NarrowPtr, NativeHandle, NativePtr};
