// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Window entry points

use super::{ThunkContext, handle_result};
use crate::Result;
use crate::buffers::{self, NativeFill};
use crate::convert::{self, delegated};
use crate::frame::CallFrame;
use crate::layout::{GuiThreadInfo64, StructKind, TitleBarInfo};
use crate::memory;
use crate::width::NativeHandle;

/// Windows are enumerated into a native scratch array of the declared
/// capacity; only the handles the service reports written are narrowed. The
/// size slot is stored back whether or not the call succeeds.
pub fn nt_user_build_hwnd_list(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let desktop = frame.get_handle();
    let unk2 = frame.get_ulong();
    let unk3 = frame.get_ulong();
    let unk4 = frame.get_ulong();
    let thread_id = frame.get_ulong();
    let count = frame.get_ulong();
    let buffer = frame.get_ptr();
    let size_ptr = frame.get_ptr();

    let staging = ctx.staging();
    let mut size = 0;
    let fill = buffers::fill_array::<NativeHandle>(&staging, count as usize, |handles| {
        let status = ctx.service.build_hwnd_list(
            desktop, unk2, unk3, unk4, thread_id, count, handles, &mut size,
        );
        NativeFill::status(status, size)
    })?;
    let ret = fill.store(&mut *ctx.memory, buffer)?;
    memory::write_u32(&mut *ctx.memory, size_ptr, size)?;
    Ok(ret)
}

pub fn nt_user_child_window_from_point_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let parent = frame.get_handle();
    let x = frame.get_long();
    let y = frame.get_long();
    let flags = frame.get_ulong();

    Ok(handle_result(
        ctx.service.child_window_from_point_ex(parent, x, y, flags),
    ))
}

pub fn nt_user_find_window_ex(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let parent = frame.get_handle();
    let child = frame.get_handle();
    let class = frame.get_ptr();
    let title = frame.get_ptr();
    let unk = frame.get_ulong();

    let class = delegated::unicode_string_to_native(&*ctx.memory, class)?;
    let title = delegated::unicode_string_to_native(&*ctx.memory, title)?;
    Ok(handle_result(ctx.service.find_window_ex(
        parent,
        child,
        class.as_ref(),
        title.as_ref(),
        unk,
    )))
}

pub fn nt_user_get_ancestor(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let kind = frame.get_ulong();

    Ok(handle_result(ctx.service.get_ancestor(hwnd, kind)))
}

pub fn nt_user_get_class_name(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let real = frame.get_ulong();
    let name = frame.get_ptr();

    let name = delegated::unicode_string_to_native(&*ctx.memory, name)?;
    Ok(ctx.service.get_class_name(hwnd, real, name.as_ref()))
}

pub fn nt_user_get_foreground_window(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(handle_result(ctx.service.get_foreground_window()))
}

/// The narrow block is output-only apart from its `cbSize`, which must match
/// the narrow layout before the service is called.
pub fn nt_user_get_gui_thread_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let thread_id = frame.get_ulong();
    let info_ptr = frame.get_ptr();

    convert::expect_sized::<GuiThreadInfo64, _>(&*ctx.memory, info_ptr)?;
    let mut info = GuiThreadInfo64 {
        cb_size: StructKind::GuiThreadInfo.native_size(),
        ..GuiThreadInfo64::default()
    };
    let ret = ctx.service.get_gui_thread_info(thread_id, &mut info);
    if ret != 0 {
        convert::write_narrow(&mut *ctx.memory, info_ptr, &info)?;
    }
    Ok(ret)
}

pub fn nt_user_get_layered_window_attributes(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let key = frame.get_ptr();
    let alpha = frame.get_ptr();
    let flags = frame.get_ptr();

    Ok(ctx
        .service
        .get_layered_window_attributes(hwnd, key.widen(), alpha.widen(), flags.widen()))
}

pub fn nt_user_get_prop(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let name = frame.get_ptr();

    Ok(handle_result(ctx.service.get_prop(hwnd, name.widen())))
}

pub fn nt_user_get_title_bar_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let info_ptr = frame.get_ptr();

    convert::expect_sized::<TitleBarInfo, _>(&*ctx.memory, info_ptr)?;
    let mut info = TitleBarInfo {
        cb_size: StructKind::TitleBarInfo.native_size(),
        ..TitleBarInfo::default()
    };
    let ret = ctx.service.get_title_bar_info(hwnd, &mut info);
    if ret != 0 {
        convert::write_narrow(&mut *ctx.memory, info_ptr, &info)?;
    }
    Ok(ret)
}

pub fn nt_user_get_window_rgn_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let hrgn = frame.get_handle();
    let unk = frame.get_ulong();

    Ok(ctx.service.get_window_rgn_ex(hwnd, hrgn, unk))
}

pub fn nt_user_internal_get_window_text(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let text = frame.get_ptr();
    let count = frame.get_long();

    Ok(ctx.service.internal_get_window_text(hwnd, text.widen(), count))
}

pub fn nt_user_lock_window_update(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();

    Ok(ctx.service.lock_window_update(hwnd))
}

pub fn nt_user_remove_prop(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let name = frame.get_ptr();

    Ok(handle_result(ctx.service.remove_prop(hwnd, name.widen())))
}

pub fn nt_user_set_prop(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let name = frame.get_ptr();
    let value = frame.get_handle();

    Ok(ctx.service.set_prop(hwnd, name.widen(), value))
}

pub fn nt_user_window_from_dc(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hdc = frame.get_handle();

    Ok(handle_result(ctx.service.window_from_dc(hdc)))
}
