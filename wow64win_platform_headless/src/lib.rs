// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Headless platform for the win32u translation layer
//!
//! This crate is the "South" side of `wow64win_shim`: a native win32u service
//! for a host without a display, a flat narrow address space, and the calling
//! thread's last-error state. Together they let every entry point run
//! end to end in tests and from the command line.

mod desktop;
mod memory;
mod thread_error;
mod win32u;

pub use desktop::{HeadlessDesktop, HeadlessWindow, RawInputPacket};
pub use memory::{FlatGuestMemory, PAGE_SIZE};
pub use thread_error::ThreadErrorState;
pub use win32u::{HeadlessWin32u, ServiceCall};

use thiserror::Error;

/// Platform errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("invalid guest region: base 0x{base:08X}, size 0x{size:X}")]
    BadRegion { base: u32, size: usize },

    #[error("guest access out of range: 0x{addr:08X}+0x{len:X}")]
    OutOfRange { addr: u32, len: usize },
}

pub type Result<T> = core::result::Result<T, PlatformError>;
