// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Native window/input service interface
//!
//! This module defines the native-width win32u interface the entry points
//! forward to, plus the constants both sides agree on.

pub mod win32u;

pub use win32u::Win32uService;

/// `GetRawInputData` commands and device types
pub mod raw_input {
    pub const RID_INPUT: u32 = 0x1000_0003;
    pub const RID_HEADER: u32 = 0x1000_0005;

    pub const RIM_TYPEMOUSE: u32 = 0;
    pub const RIM_TYPEKEYBOARD: u32 = 1;
    pub const RIM_TYPEHID: u32 = 2;
}

/// Wait results and limits
pub mod wait {
    pub const WAIT_OBJECT_0: u32 = 0;
    pub const WAIT_TIMEOUT: u32 = 0x102;
    pub const WAIT_FAILED: u32 = 0xFFFF_FFFF;
    pub const MAXIMUM_WAIT_OBJECTS: usize = 64;
}

/// Mouse movement history
pub mod mouse {
    pub const GMMP_USE_DISPLAY_POINTS: u32 = 1;
    pub const GMMP_USE_HIGH_RESOLUTION_POINTS: u32 = 2;
    /// Points kept in the movement history
    pub const MAX_MOUSE_POINTS: usize = 64;
}
