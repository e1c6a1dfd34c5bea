// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Menu entry points

use super::{ThunkContext, signed_result};
use crate::Result;
use crate::convert::menu as menu_item;
use crate::convert::{self, Transcode, delegated};
use crate::frame::CallFrame;
use crate::layout::{MenuInfo64, MenuItemInfo64};
use crate::memory;

pub fn nt_user_check_menu_item(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let id = frame.get_ulong();
    let flags = frame.get_ulong();

    Ok(ctx.service.check_menu_item(menu, id, flags))
}

pub fn nt_user_delete_menu(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let menu = frame.get_handle();
    let id = frame.get_ulong();
    let flags = frame.get_ulong();

    Ok(ctx.service.delete_menu(menu, id, flags))
}

pub fn nt_user_end_menu(ctx: &mut ThunkContext<'_>, _frame: &mut CallFrame<'_>) -> Result<u32> {
    Ok(ctx.service.end_menu())
}

pub fn nt_user_get_menu_item_rect(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let menu = frame.get_handle();
    let item = frame.get_ulong();
    let rect = frame.get_ptr();

    Ok(ctx.service.get_menu_item_rect(hwnd, menu, item, rect.widen()))
}

pub fn nt_user_menu_item_from_point(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let menu = frame.get_handle();
    let x = frame.get_long();
    let y = frame.get_long();

    Ok(signed_result(ctx.service.menu_item_from_point(hwnd, menu, x, y)))
}

pub fn nt_user_remove_menu(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let menu = frame.get_handle();
    let id = frame.get_ulong();
    let flags = frame.get_ulong();

    Ok(ctx.service.remove_menu(menu, id, flags))
}

pub fn nt_user_set_menu_context_help_id(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let id = frame.get_ulong();

    Ok(ctx.service.set_menu_context_help_id(menu, id))
}

pub fn nt_user_set_menu_default_item(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let item = frame.get_ulong();
    let by_pos = frame.get_ulong();

    Ok(ctx.service.set_menu_default_item(menu, item, by_pos))
}

/// A null block stays null.
pub fn nt_user_thunked_menu_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let info_ptr = frame.get_ptr();

    if info_ptr.is_null() {
        return Ok(ctx.service.thunked_menu_info(menu, None));
    }
    let narrow = convert::read_sized::<MenuInfo64, _>(&*ctx.memory, info_ptr)?;
    let info = MenuInfo64::to_native(&narrow);
    Ok(ctx.service.thunked_menu_info(menu, Some(&info)))
}

/// Which item fields are staged, and whether the block is written back,
/// depends on `method`; see [`menu_item::transfer_for`].
pub fn nt_user_thunked_menu_item_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let pos = frame.get_ulong();
    let flags = frame.get_ulong();
    let method = frame.get_ulong();
    let info_ptr = frame.get_ptr();
    let text_ptr = frame.get_ptr();

    if info_ptr.is_null() {
        let text = delegated::unicode_string_to_native(&*ctx.memory, text_ptr)?;
        return Ok(ctx
            .service
            .thunked_menu_item_info(menu, pos, flags, method, None, text.as_ref()));
    }

    let narrow = convert::read_sized::<MenuItemInfo64, _>(&*ctx.memory, info_ptr)?;
    let text = delegated::unicode_string_to_native(&*ctx.memory, text_ptr)?;
    let transfer = menu_item::transfer_for(method);
    let mut info = menu_item::stage_item(transfer, &narrow);
    let ret = ctx.service.thunked_menu_item_info(
        menu,
        pos,
        flags,
        method,
        Some(&mut info),
        text.as_ref(),
    );
    let output = menu_item::finish_item(transfer, &narrow, &info).filter(|_| ret != 0);
    if let Some(item) = output {
        memory::write_struct(&mut *ctx.memory, info_ptr, &item)?;
    }
    Ok(ret)
}

pub fn nt_user_track_popup_menu_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let menu = frame.get_handle();
    let flags = frame.get_ulong();
    let x = frame.get_long();
    let y = frame.get_long();
    let hwnd = frame.get_handle();
    let params = frame.get_ptr();

    Ok(ctx
        .service
        .track_popup_menu_ex(menu, flags, x, y, hwnd, params.widen()))
}
