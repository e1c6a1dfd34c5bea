// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Keyboard, cursor, mouse and input-context entry points

use super::{ThunkContext, handle_result};
use crate::buffers::{self, NativeFill};
use crate::convert::{self, delegated};
use crate::frame::CallFrame;
use crate::layout::{MouseMovePoint64, StructKind};
use crate::service::mouse::MAX_MOUSE_POINTS;
use crate::width::narrow_uint_ptr;
use crate::{Result, Wow64Error};

pub fn nt_user_attach_thread_input(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let from = frame.get_ulong();
    let to = frame.get_ulong();
    let attach = frame.get_ulong();

    Ok(ctx.service.attach_thread_input(from, to, attach))
}

/// The `SHORT` result is sign-extended into the return register.
#[allow(clippy::cast_sign_loss)]
pub fn nt_user_get_key_state(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let vkey = frame.get_long();

    Ok(i32::from(ctx.service.get_key_state(vkey)) as u32)
}

pub fn nt_user_get_keyboard_layout(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let thread_id = frame.get_ulong();

    Ok(handle_result(ctx.service.get_keyboard_layout(thread_id)))
}

pub fn nt_user_get_keyboard_layout_name(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let name = frame.get_ptr();

    Ok(ctx.service.get_keyboard_layout_name(name.widen()))
}

pub fn nt_user_get_keyboard_state(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let state = frame.get_ptr();

    Ok(ctx.service.get_keyboard_state(state.widen()))
}

pub fn nt_user_set_keyboard_state(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let state = frame.get_ptr();

    Ok(ctx.service.set_keyboard_state(state.widen()))
}

pub fn nt_user_find_existing_cursor_icon(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let module = frame.get_ptr();
    let res_name = frame.get_ptr();
    let desc = frame.get_ptr();

    let module = delegated::unicode_string_to_native(&*ctx.memory, module)?;
    let res_name = delegated::unicode_string_to_native(&*ctx.memory, res_name)?;
    Ok(handle_result(ctx.service.find_existing_cursor_icon(
        module.as_ref(),
        res_name.as_ref(),
        desc.widen(),
    )))
}

pub fn nt_user_get_caret_blink_time(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(ctx.service.get_caret_blink_time())
}

pub fn nt_user_get_caret_pos(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let pt = frame.get_ptr();

    Ok(ctx.service.get_caret_pos(pt.widen()))
}

pub fn nt_user_get_cursor(ctx: &mut ThunkContext<'_>, _frame: &mut CallFrame<'_>) -> Result<u32> {
    Ok(handle_result(ctx.service.get_cursor()))
}

pub fn nt_user_get_cursor_frame_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let cursor = frame.get_handle();
    let step = frame.get_ulong();
    let rate_jiffies = frame.get_ptr();
    let num_steps = frame.get_ptr();

    Ok(handle_result(ctx.service.get_cursor_frame_info(
        cursor,
        step,
        rate_jiffies.widen(),
        num_steps.widen(),
    )))
}

pub fn nt_user_get_double_click_time(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(ctx.service.get_double_click_time())
}

pub fn nt_user_get_icon_size(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let icon = frame.get_handle();
    let step = frame.get_ulong();
    let width = frame.get_ptr();
    let height = frame.get_ptr();

    Ok(ctx
        .service
        .get_icon_size(icon, step, width.widen(), height.widen()))
}

/// `count` must lie in `0..=64`; only the points the service reports are
/// narrowed into `ptout`.
pub fn nt_user_get_mouse_move_points_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let size = frame.get_ulong();
    let ptin = frame.get_ptr();
    let ptout = frame.get_ptr();
    let count = frame.get_long();
    let resolution = frame.get_ulong();

    StructKind::MouseMovePoint.expect_narrow_size(size)?;
    let count = usize::try_from(count)
        .ok()
        .filter(|&count| count <= MAX_MOUSE_POINTS)
        .ok_or_else(|| Wow64Error::InvalidParameter(format!("{count} mouse points")))?;
    if ptin.is_null() || ptout.is_null() {
        return Err(Wow64Error::InvalidParameter(
            "null mouse point buffer".to_string(),
        ));
    }

    let point: MouseMovePoint64 = convert::read_native(&*ctx.memory, ptin)?;
    let native_size = StructKind::MouseMovePoint.native_size();
    let staging = ctx.staging();
    let fill = buffers::fill_array::<MouseMovePoint64>(&staging, count, |points| {
        NativeFill::signed(ctx.service.get_mouse_move_points_ex(
            native_size,
            &point,
            points,
            resolution,
        ))
    })?;
    fill.store(&mut *ctx.memory, ptout)
}

pub fn nt_user_associate_input_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let input_ctx = frame.get_handle();
    let flags = frame.get_ulong();

    Ok(ctx.service.associate_input_context(hwnd, input_ctx, flags))
}

pub fn nt_user_create_input_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let client_ptr = frame.get_uint_ptr();

    Ok(handle_result(ctx.service.create_input_context(client_ptr)))
}

pub fn nt_user_destroy_input_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let input_ctx = frame.get_handle();

    Ok(ctx.service.destroy_input_context(input_ctx))
}

pub fn nt_user_query_input_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let input_ctx = frame.get_handle();
    let attr = frame.get_ulong();

    Ok(narrow_uint_ptr(ctx.service.query_input_context(input_ctx, attr)))
}

pub fn nt_user_update_input_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let input_ctx = frame.get_handle();
    let attr = frame.get_ulong();
    let value = frame.get_uint_ptr();

    Ok(ctx.service.update_input_context(input_ctx, attr, value))
}
