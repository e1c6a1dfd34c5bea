// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Fixed-structure transcoders
//!
//! Every dual-layout structure implements [`Transcode`] on its native type.
//! The narrow layout and the [`StructKind`] key are associated items, so a
//! call site names the native type once and gets the validate-then-copy
//! skeleton from the helpers below.

pub mod delegated;
pub mod menu;

use crate::Result;
use crate::layout::{
    GuiThreadInfo32, GuiThreadInfo64, MenuInfo32, MenuInfo64, MenuItemInfo32, MenuItemInfo64,
    MouseMovePoint32, MouseMovePoint64, Msg32, Msg64, RawInputDevice32, RawInputDevice64,
    RawInputDeviceList32, RawInputDeviceList64, RawInputHeader32, RawInputHeader64, StructKind,
    TitleBarInfo, UnicodeString32, UnicodeString64,
};
use crate::memory::{self, GuestMemory};
use crate::width::{NarrowHandle, NarrowPtr, NativeHandle, truncate_uint_ptr};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// A native structure with a narrow counterpart
pub trait Transcode: Sized {
    /// The narrow client's layout
    type Narrow: FromBytes + IntoBytes + Immutable + KnownLayout + Copy;

    /// Key of this pair in the layout registry
    const KIND: StructKind;

    /// Widen every field.
    fn to_native(narrow: &Self::Narrow) -> Self;

    /// Narrow every field. Handles go through the checked narrowing.
    fn to_narrow(&self) -> Self::Narrow;
}

/// Read the narrow structure at `addr` and widen it.
pub fn read_native<T, M>(mem: &M, addr: NarrowPtr) -> Result<T>
where
    T: Transcode,
    M: GuestMemory + ?Sized,
{
    let narrow: T::Narrow = memory::read_struct(mem, addr)?;
    Ok(T::to_native(&narrow))
}

/// Narrow `value` and store it at `addr`.
pub fn write_narrow<T, M>(mem: &mut M, addr: NarrowPtr, value: &T) -> Result<()>
where
    T: Transcode,
    M: GuestMemory + ?Sized,
{
    memory::write_struct(mem, addr, &value.to_narrow())
}

/// Check the leading `cbSize` field of a self-sized narrow structure.
pub fn expect_sized<T, M>(mem: &M, addr: NarrowPtr) -> Result<()>
where
    T: Transcode,
    M: GuestMemory + ?Sized,
{
    let declared = memory::read_u32(mem, addr)?;
    T::KIND.expect_narrow_size(declared)
}

/// Read a self-sized narrow structure.
///
/// The rest of the structure is only read once `cbSize` matches the narrow
/// layout.
pub fn read_sized<T, M>(mem: &M, addr: NarrowPtr) -> Result<T::Narrow>
where
    T: Transcode,
    M: GuestMemory + ?Sized,
{
    expect_sized::<T, M>(mem, addr)?;
    memory::read_struct(mem, addr)
}

impl Transcode for NativeHandle {
    type Narrow = NarrowHandle;
    const KIND: StructKind = StructKind::Handle;

    fn to_native(narrow: &NarrowHandle) -> Self {
        narrow.zero_extend()
    }

    fn to_narrow(&self) -> NarrowHandle {
        self.narrow()
    }
}

impl Transcode for Msg64 {
    type Narrow = Msg32;
    const KIND: StructKind = StructKind::Msg;

    fn to_native(msg: &Msg32) -> Self {
        Self {
            hwnd: msg.hwnd.zero_extend(),
            message: msg.message,
            w_param: u64::from(msg.w_param),
            l_param: u64::from(msg.l_param),
            time: msg.time,
            pt: msg.pt,
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> Msg32 {
        Msg32 {
            hwnd: self.hwnd.narrow(),
            message: self.message,
            w_param: truncate_uint_ptr(self.w_param),
            l_param: truncate_uint_ptr(self.l_param),
            time: self.time,
            pt: self.pt,
        }
    }
}

impl Transcode for GuiThreadInfo64 {
    type Narrow = GuiThreadInfo32;
    const KIND: StructKind = StructKind::GuiThreadInfo;

    fn to_native(info: &GuiThreadInfo32) -> Self {
        Self {
            cb_size: Self::KIND.native_size(),
            flags: info.flags,
            hwnd_active: info.hwnd_active.zero_extend(),
            hwnd_focus: info.hwnd_focus.zero_extend(),
            hwnd_capture: info.hwnd_capture.zero_extend(),
            hwnd_menu_owner: info.hwnd_menu_owner.zero_extend(),
            hwnd_move_size: info.hwnd_move_size.zero_extend(),
            hwnd_caret: info.hwnd_caret.zero_extend(),
            rc_caret: info.rc_caret,
        }
    }

    fn to_narrow(&self) -> GuiThreadInfo32 {
        GuiThreadInfo32 {
            cb_size: Self::KIND.narrow_size(),
            flags: self.flags,
            hwnd_active: self.hwnd_active.narrow(),
            hwnd_focus: self.hwnd_focus.narrow(),
            hwnd_capture: self.hwnd_capture.narrow(),
            hwnd_menu_owner: self.hwnd_menu_owner.narrow(),
            hwnd_move_size: self.hwnd_move_size.narrow(),
            hwnd_caret: self.hwnd_caret.narrow(),
            rc_caret: self.rc_caret,
        }
    }
}

impl Transcode for MenuInfo64 {
    type Narrow = MenuInfo32;
    const KIND: StructKind = StructKind::MenuInfo;

    fn to_native(info: &MenuInfo32) -> Self {
        Self {
            cb_size: Self::KIND.native_size(),
            f_mask: info.f_mask,
            dw_style: info.dw_style,
            cy_max: info.cy_max,
            hbr_back: info.hbr_back.zero_extend(),
            dw_context_help_id: info.dw_context_help_id,
            dw_menu_data: u64::from(info.dw_menu_data),
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> MenuInfo32 {
        MenuInfo32 {
            cb_size: Self::KIND.narrow_size(),
            f_mask: self.f_mask,
            dw_style: self.dw_style,
            cy_max: self.cy_max,
            hbr_back: self.hbr_back.narrow(),
            dw_context_help_id: self.dw_context_help_id,
            dw_menu_data: truncate_uint_ptr(self.dw_menu_data),
        }
    }
}

impl Transcode for MenuItemInfo64 {
    type Narrow = MenuItemInfo32;
    const KIND: StructKind = StructKind::MenuItemInfo;

    fn to_native(item: &MenuItemInfo32) -> Self {
        Self {
            cb_size: Self::KIND.native_size(),
            f_mask: item.f_mask,
            f_type: item.f_type,
            f_state: item.f_state,
            w_id: item.w_id,
            h_sub_menu: item.h_sub_menu.zero_extend(),
            hbmp_checked: item.hbmp_checked.zero_extend(),
            hbmp_unchecked: item.hbmp_unchecked.zero_extend(),
            dw_item_data: u64::from(item.dw_item_data),
            dw_type_data: item.dw_type_data.widen(),
            cch: item.cch,
            hbmp_item: item.hbmp_item.zero_extend(),
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> MenuItemInfo32 {
        MenuItemInfo32 {
            cb_size: Self::KIND.narrow_size(),
            f_mask: self.f_mask,
            f_type: self.f_type,
            f_state: self.f_state,
            w_id: self.w_id,
            h_sub_menu: self.h_sub_menu.narrow(),
            hbmp_checked: self.hbmp_checked.narrow(),
            hbmp_unchecked: self.hbmp_unchecked.narrow(),
            dw_item_data: truncate_uint_ptr(self.dw_item_data),
            dw_type_data: self.dw_type_data.narrow(),
            cch: self.cch,
            hbmp_item: self.hbmp_item.narrow(),
        }
    }
}

impl Transcode for TitleBarInfo {
    type Narrow = TitleBarInfo;
    const KIND: StructKind = StructKind::TitleBarInfo;

    fn to_native(info: &TitleBarInfo) -> Self {
        *info
    }

    fn to_narrow(&self) -> TitleBarInfo {
        *self
    }
}

/// Header size difference between the two layouts
const RAW_HEADER_GROWTH: u32 =
    StructKind::RawInputHeader.native_size() - StructKind::RawInputHeader.narrow_size();

impl Transcode for RawInputHeader64 {
    type Narrow = RawInputHeader32;
    const KIND: StructKind = StructKind::RawInputHeader;

    fn to_native(header: &RawInputHeader32) -> Self {
        Self {
            dw_type: header.dw_type,
            dw_size: header.dw_size.saturating_add(RAW_HEADER_GROWTH),
            h_device: header.h_device.zero_extend(),
            w_param: u64::from(header.w_param),
        }
    }

    fn to_narrow(&self) -> RawInputHeader32 {
        RawInputHeader32 {
            dw_type: self.dw_type,
            dw_size: self.dw_size.saturating_sub(RAW_HEADER_GROWTH),
            h_device: self.h_device.narrow(),
            w_param: truncate_uint_ptr(self.w_param),
        }
    }
}

impl Transcode for RawInputDevice64 {
    type Narrow = RawInputDevice32;
    const KIND: StructKind = StructKind::RawInputDevice;

    fn to_native(device: &RawInputDevice32) -> Self {
        Self {
            us_usage_page: device.us_usage_page,
            us_usage: device.us_usage,
            dw_flags: device.dw_flags,
            hwnd_target: device.hwnd_target.zero_extend(),
        }
    }

    fn to_narrow(&self) -> RawInputDevice32 {
        RawInputDevice32 {
            us_usage_page: self.us_usage_page,
            us_usage: self.us_usage,
            dw_flags: self.dw_flags,
            hwnd_target: self.hwnd_target.narrow(),
        }
    }
}

impl Transcode for RawInputDeviceList64 {
    type Narrow = RawInputDeviceList32;
    const KIND: StructKind = StructKind::RawInputDeviceList;

    fn to_native(entry: &RawInputDeviceList32) -> Self {
        Self {
            h_device: entry.h_device.zero_extend(),
            dw_type: entry.dw_type,
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> RawInputDeviceList32 {
        RawInputDeviceList32 {
            h_device: self.h_device.narrow(),
            dw_type: self.dw_type,
        }
    }
}

impl Transcode for MouseMovePoint64 {
    type Narrow = MouseMovePoint32;
    const KIND: StructKind = StructKind::MouseMovePoint;

    fn to_native(point: &MouseMovePoint32) -> Self {
        Self {
            x: point.x,
            y: point.y,
            time: point.time,
            dw_extra_info: u64::from(point.dw_extra_info),
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> MouseMovePoint32 {
        MouseMovePoint32 {
            x: self.x,
            y: self.y,
            time: self.time,
            dw_extra_info: truncate_uint_ptr(self.dw_extra_info),
        }
    }
}

impl Transcode for UnicodeString64 {
    type Narrow = UnicodeString32;
    const KIND: StructKind = StructKind::UnicodeString;

    fn to_native(string: &UnicodeString32) -> Self {
        Self {
            length: string.length,
            maximum_length: string.maximum_length,
            buffer: string.buffer.widen(),
            ..Self::default()
        }
    }

    fn to_narrow(&self) -> UnicodeString32 {
        UnicodeString32 {
            length: self.length,
            maximum_length: self.maximum_length,
            buffer: self.buffer.narrow(),
        }
    }
}
