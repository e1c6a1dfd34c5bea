// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Menu-item-info staging
//!
//! `NtUserThunkedMenuItemInfo` multiplexes several menu operations through one
//! entry point. Which fields of the item block carry data depends on the
//! operation, so the native block is staged per operation.

use crate::convert::Transcode;
use crate::layout::{MenuItemInfo32, MenuItemInfo64, StructKind};

/// Operation selector of `NtUserThunkedMenuItemInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MenuItemMethod {
    SetMenuItemInfo = 0,
    InsertMenuItem = 1,
    CheckMenuRadioItem = 0x1000,
    GetMenuDefaultItem = 0x1001,
    GetMenuItemId = 0x1002,
    GetMenuItemInfoA = 0x1003,
    GetMenuItemInfoW = 0x1004,
    GetMenuState = 0x1005,
    GetSubMenu = 0x1006,
}

/// Which direction item fields travel for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemTransfer {
    /// Every field is consumed by the service
    Input,
    /// The service fills the item; only the mask and the text buffer go in
    Output,
    /// Only the mask is meaningful
    MaskOnly,
}

impl MenuItemMethod {
    pub fn from_raw(method: u32) -> Option<Self> {
        Some(match method {
            0 => Self::SetMenuItemInfo,
            1 => Self::InsertMenuItem,
            0x1000 => Self::CheckMenuRadioItem,
            0x1001 => Self::GetMenuDefaultItem,
            0x1002 => Self::GetMenuItemId,
            0x1003 => Self::GetMenuItemInfoA,
            0x1004 => Self::GetMenuItemInfoW,
            0x1005 => Self::GetMenuState,
            0x1006 => Self::GetSubMenu,
            _ => return None,
        })
    }

    pub fn transfer(self) -> MenuItemTransfer {
        match self {
            Self::SetMenuItemInfo | Self::InsertMenuItem => MenuItemTransfer::Input,
            Self::GetMenuItemInfoA | Self::GetMenuItemInfoW => MenuItemTransfer::Output,
            Self::CheckMenuRadioItem
            | Self::GetMenuDefaultItem
            | Self::GetMenuItemId
            | Self::GetMenuState
            | Self::GetSubMenu => MenuItemTransfer::MaskOnly,
        }
    }
}

/// Transfer direction for a raw method value. Unknown methods only see the mask.
pub fn transfer_for(method: u32) -> MenuItemTransfer {
    MenuItemMethod::from_raw(method).map_or(MenuItemTransfer::MaskOnly, MenuItemMethod::transfer)
}

/// Build the native item block handed to the service.
pub fn stage_item(transfer: MenuItemTransfer, item: &MenuItemInfo32) -> MenuItemInfo64 {
    let mask_only = MenuItemInfo64 {
        cb_size: StructKind::MenuItemInfo.native_size(),
        f_mask: item.f_mask,
        ..MenuItemInfo64::default()
    };
    match transfer {
        MenuItemTransfer::Input => MenuItemInfo64::to_native(item),
        MenuItemTransfer::Output => MenuItemInfo64 {
            dw_type_data: item.dw_type_data.widen(),
            cch: item.cch,
            ..mask_only
        },
        MenuItemTransfer::MaskOnly => mask_only,
    }
}

/// The narrow block to write back after a successful call, if the operation
/// produces one.
pub fn finish_item(
    transfer: MenuItemTransfer,
    item: &MenuItemInfo32,
    native: &MenuItemInfo64,
) -> Option<MenuItemInfo32> {
    match transfer {
        MenuItemTransfer::Output => Some(MenuItemInfo32 {
            f_mask: item.f_mask,
            ..native.to_narrow()
        }),
        MenuItemTransfer::Input | MenuItemTransfer::MaskOnly => None,
    }
}
