// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Structure layouts at both pointer widths
//!
//! `*32` types are the narrow client's layouts: every pointer or handle is a
//! 32-bit integer and nothing is padded. `*64` types are the native layouts,
//! with padding spelled out so the byte images are fully defined. Sizes are
//! pinned below and exposed through [`StructKind`].

use crate::width::{NarrowHandle, NarrowPtr, NativeHandle, NativePtr};
use crate::{Result, Wow64Error};
use core::mem::size_of;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// POINT, identical at both widths
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// RECT, identical at both widths
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Narrow MSG
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Msg32 {
    pub hwnd: NarrowHandle,
    pub message: u32,
    pub w_param: u32,
    pub l_param: u32,
    pub time: u32,
    pub pt: Point,
}

/// Native MSG
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Msg64 {
    pub hwnd: NativeHandle,
    pub message: u32,
    pub _pad0: u32,
    pub w_param: u64,
    pub l_param: u64,
    pub time: u32,
    pub pt: Point,
    pub _pad1: u32,
}

/// Narrow GUITHREADINFO
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct GuiThreadInfo32 {
    pub cb_size: u32,
    pub flags: u32,
    pub hwnd_active: NarrowHandle,
    pub hwnd_focus: NarrowHandle,
    pub hwnd_capture: NarrowHandle,
    pub hwnd_menu_owner: NarrowHandle,
    pub hwnd_move_size: NarrowHandle,
    pub hwnd_caret: NarrowHandle,
    pub rc_caret: Rect,
}

/// Native GUITHREADINFO
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct GuiThreadInfo64 {
    pub cb_size: u32,
    pub flags: u32,
    pub hwnd_active: NativeHandle,
    pub hwnd_focus: NativeHandle,
    pub hwnd_capture: NativeHandle,
    pub hwnd_menu_owner: NativeHandle,
    pub hwnd_move_size: NativeHandle,
    pub hwnd_caret: NativeHandle,
    pub rc_caret: Rect,
}

/// Narrow MENUINFO
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MenuInfo32 {
    pub cb_size: u32,
    pub f_mask: u32,
    pub dw_style: u32,
    pub cy_max: u32,
    pub hbr_back: NarrowHandle,
    pub dw_context_help_id: u32,
    pub dw_menu_data: u32,
}

/// Native MENUINFO
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MenuInfo64 {
    pub cb_size: u32,
    pub f_mask: u32,
    pub dw_style: u32,
    pub cy_max: u32,
    pub hbr_back: NativeHandle,
    pub dw_context_help_id: u32,
    pub _pad0: u32,
    pub dw_menu_data: u64,
}

/// Narrow MENUITEMINFOW
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MenuItemInfo32 {
    pub cb_size: u32,
    pub f_mask: u32,
    pub f_type: u32,
    pub f_state: u32,
    pub w_id: u32,
    pub h_sub_menu: NarrowHandle,
    pub hbmp_checked: NarrowHandle,
    pub hbmp_unchecked: NarrowHandle,
    pub dw_item_data: u32,
    pub dw_type_data: NarrowPtr,
    pub cch: u32,
    pub hbmp_item: NarrowHandle,
}

/// Native MENUITEMINFOW
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MenuItemInfo64 {
    pub cb_size: u32,
    pub f_mask: u32,
    pub f_type: u32,
    pub f_state: u32,
    pub w_id: u32,
    pub _pad0: u32,
    pub h_sub_menu: NativeHandle,
    pub hbmp_checked: NativeHandle,
    pub hbmp_unchecked: NativeHandle,
    pub dw_item_data: u64,
    pub dw_type_data: NativePtr,
    pub cch: u32,
    pub _pad1: u32,
    pub hbmp_item: NativeHandle,
}

/// TITLEBARINFO, identical at both widths
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct TitleBarInfo {
    pub cb_size: u32,
    pub rc_title_bar: Rect,
    pub rgstate: [u32; 6],
}

/// Narrow RAWINPUTHEADER
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputHeader32 {
    pub dw_type: u32,
    pub dw_size: u32,
    pub h_device: NarrowHandle,
    pub w_param: u32,
}

/// Native RAWINPUTHEADER
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputHeader64 {
    pub dw_type: u32,
    pub dw_size: u32,
    pub h_device: NativeHandle,
    pub w_param: u64,
}

/// Narrow RAWINPUTDEVICE
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputDevice32 {
    pub us_usage_page: u16,
    pub us_usage: u16,
    pub dw_flags: u32,
    pub hwnd_target: NarrowHandle,
}

/// Native RAWINPUTDEVICE
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputDevice64 {
    pub us_usage_page: u16,
    pub us_usage: u16,
    pub dw_flags: u32,
    pub hwnd_target: NativeHandle,
}

/// Narrow RAWINPUTDEVICELIST
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputDeviceList32 {
    pub h_device: NarrowHandle,
    pub dw_type: u32,
}

/// Native RAWINPUTDEVICELIST
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RawInputDeviceList64 {
    pub h_device: NativeHandle,
    pub dw_type: u32,
    pub _pad0: u32,
}

/// Narrow MOUSEMOVEPOINT
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MouseMovePoint32 {
    pub x: i32,
    pub y: i32,
    pub time: u32,
    pub dw_extra_info: u32,
}

/// Native MOUSEMOVEPOINT
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct MouseMovePoint64 {
    pub x: i32,
    pub y: i32,
    pub time: u32,
    pub _pad0: u32,
    pub dw_extra_info: u64,
}

/// Narrow UNICODE_STRING
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct UnicodeString32 {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: NarrowPtr,
}

/// Native UNICODE_STRING
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct UnicodeString64 {
    pub length: u16,
    pub maximum_length: u16,
    pub _pad0: u32,
    pub buffer: NativePtr,
}

/// Narrow OBJECT_ATTRIBUTES
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct ObjectAttributes32 {
    pub length: u32,
    pub root_directory: NarrowHandle,
    pub object_name: NarrowPtr,
    pub attributes: u32,
    pub security_descriptor: NarrowPtr,
    pub security_quality_of_service: NarrowPtr,
}

/// Native OBJECT_ATTRIBUTES
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct ObjectAttributes64 {
    pub length: u32,
    pub _pad0: u32,
    pub root_directory: NativeHandle,
    pub object_name: NativePtr,
    pub attributes: u32,
    pub _pad1: u32,
    pub security_descriptor: NativePtr,
    pub security_quality_of_service: NativePtr,
}

const _: () = assert!(size_of::<Msg32>() == 28 && size_of::<Msg64>() == 48);
const _: () = assert!(size_of::<GuiThreadInfo32>() == 48 && size_of::<GuiThreadInfo64>() == 72);
const _: () = assert!(size_of::<MenuInfo32>() == 28 && size_of::<MenuInfo64>() == 40);
const _: () = assert!(size_of::<MenuItemInfo32>() == 48 && size_of::<MenuItemInfo64>() == 80);
const _: () = assert!(size_of::<TitleBarInfo>() == 44);
const _: () = assert!(size_of::<RawInputHeader32>() == 16 && size_of::<RawInputHeader64>() == 24);
const _: () = assert!(size_of::<RawInputDevice32>() == 12 && size_of::<RawInputDevice64>() == 16);
const _: () =
    assert!(size_of::<RawInputDeviceList32>() == 8 && size_of::<RawInputDeviceList64>() == 16);
const _: () = assert!(size_of::<MouseMovePoint32>() == 16 && size_of::<MouseMovePoint64>() == 24);
const _: () = assert!(size_of::<UnicodeString32>() == 8 && size_of::<UnicodeString64>() == 16);
const _: () =
    assert!(size_of::<ObjectAttributes32>() == 24 && size_of::<ObjectAttributes64>() == 48);

/// Every structure that exists in two layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    Msg,
    GuiThreadInfo,
    MenuInfo,
    MenuItemInfo,
    TitleBarInfo,
    RawInputHeader,
    RawInputDevice,
    RawInputDeviceList,
    MouseMovePoint,
    UnicodeString,
    ObjectAttributes,
    Handle,
}

#[allow(clippy::cast_possible_truncation)]
const fn size32<T>() -> u32 {
    size_of::<T>() as u32
}

impl StructKind {
    pub const ALL: [StructKind; 12] = [
        StructKind::Msg,
        StructKind::GuiThreadInfo,
        StructKind::MenuInfo,
        StructKind::MenuItemInfo,
        StructKind::TitleBarInfo,
        StructKind::RawInputHeader,
        StructKind::RawInputDevice,
        StructKind::RawInputDeviceList,
        StructKind::MouseMovePoint,
        StructKind::UnicodeString,
        StructKind::ObjectAttributes,
        StructKind::Handle,
    ];

    /// Size of the narrow layout in bytes
    pub const fn narrow_size(self) -> u32 {
        match self {
            StructKind::Msg => size32::<Msg32>(),
            StructKind::GuiThreadInfo => size32::<GuiThreadInfo32>(),
            StructKind::MenuInfo => size32::<MenuInfo32>(),
            StructKind::MenuItemInfo => size32::<MenuItemInfo32>(),
            StructKind::TitleBarInfo => size32::<TitleBarInfo>(),
            StructKind::RawInputHeader => size32::<RawInputHeader32>(),
            StructKind::RawInputDevice => size32::<RawInputDevice32>(),
            StructKind::RawInputDeviceList => size32::<RawInputDeviceList32>(),
            StructKind::MouseMovePoint => size32::<MouseMovePoint32>(),
            StructKind::UnicodeString => size32::<UnicodeString32>(),
            StructKind::ObjectAttributes => size32::<ObjectAttributes32>(),
            StructKind::Handle => size32::<NarrowHandle>(),
        }
    }

    /// Size of the native layout in bytes
    pub const fn native_size(self) -> u32 {
        match self {
            StructKind::Msg => size32::<Msg64>(),
            StructKind::GuiThreadInfo => size32::<GuiThreadInfo64>(),
            StructKind::MenuInfo => size32::<MenuInfo64>(),
            StructKind::MenuItemInfo => size32::<MenuItemInfo64>(),
            StructKind::TitleBarInfo => size32::<TitleBarInfo>(),
            StructKind::RawInputHeader => size32::<RawInputHeader64>(),
            StructKind::RawInputDevice => size32::<RawInputDevice64>(),
            StructKind::RawInputDeviceList => size32::<RawInputDeviceList64>(),
            StructKind::MouseMovePoint => size32::<MouseMovePoint64>(),
            StructKind::UnicodeString => size32::<UnicodeString64>(),
            StructKind::ObjectAttributes => size32::<ObjectAttributes64>(),
            StructKind::Handle => size32::<NativeHandle>(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StructKind::Msg => "MSG",
            StructKind::GuiThreadInfo => "GUITHREADINFO",
            StructKind::MenuInfo => "MENUINFO",
            StructKind::MenuItemInfo => "MENUITEMINFOW",
            StructKind::TitleBarInfo => "TITLEBARINFO",
            StructKind::RawInputHeader => "RAWINPUTHEADER",
            StructKind::RawInputDevice => "RAWINPUTDEVICE",
            StructKind::RawInputDeviceList => "RAWINPUTDEVICELIST",
            StructKind::MouseMovePoint => "MOUSEMOVEPOINT",
            StructKind::UnicodeString => "UNICODE_STRING",
            StructKind::ObjectAttributes => "OBJECT_ATTRIBUTES",
            StructKind::Handle => "HANDLE",
        }
    }

    /// Check a caller-declared structure or element size against the narrow
    /// layout.
    pub fn expect_narrow_size(self, declared: u32) -> Result<()> {
        if declared == self.narrow_size() {
            Ok(())
        } else {
            Err(Wow64Error::SizeMismatch {
                kind: self.name(),
                declared,
                expected: self.narrow_size(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    #[test]
    fn test_narrow_layouts_shrink_or_match() {
        for kind in StructKind::ALL {
            assert!(
                kind.narrow_size() <= kind.native_size(),
                "{} narrow layout is larger than native",
                kind.name()
            );
        }
        assert_eq!(
            StructKind::TitleBarInfo.narrow_size(),
            StructKind::TitleBarInfo.native_size()
        );
    }

    #[test]
    fn test_expect_narrow_size() {
        assert!(StructKind::RawInputHeader.expect_narrow_size(16).is_ok());
        assert_eq!(
            StructKind::RawInputHeader.expect_narrow_size(24),
            Err(Wow64Error::SizeMismatch {
                kind: "RAWINPUTHEADER",
                declared: 24,
                expected: 16,
            })
        );
    }

    #[test]
    fn test_native_msg_field_offsets() {
        let msg = Msg64 {
            hwnd: NativeHandle(0x1111),
            message: 0x22,
            w_param: 0x33,
            l_param: 0x44,
            time: 0x55,
            pt: Point { x: 0x66, y: 0x77 },
            ..Default::default()
        };
        let bytes = msg.as_bytes();
        assert_eq!(bytes[0..2], [0x11, 0x11]);
        assert_eq!(bytes[8], 0x22);
        assert_eq!(bytes[16], 0x33);
        assert_eq!(bytes[24], 0x44);
        assert_eq!(bytes[32], 0x55);
        assert_eq!(bytes[36], 0x66);
        assert_eq!(bytes[40], 0x77);
    }

    #[test]
    fn test_native_raw_input_header_offsets() {
        let header = RawInputHeader64 {
            dw_type: 1,
            dw_size: 48,
            h_device: NativeHandle(0xABCD),
            w_param: 2,
        };
        let bytes = header.as_bytes();
        assert_eq!(bytes[4], 48);
        assert_eq!(bytes[8..10], [0xCD, 0xAB]);
        assert_eq!(bytes[16], 2);
    }
}
