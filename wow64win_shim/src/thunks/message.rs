// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Message, wait and timer entry points

use super::ThunkContext;
use crate::buffers;
use crate::convert;
use crate::frame::CallFrame;
use crate::layout::Msg64;
use crate::service::wait::MAXIMUM_WAIT_OBJECTS;
use crate::width::{NativeHandle, narrow_uint_ptr, truncate_uint_ptr};
use crate::{Result, Wow64Error};

/// Filter hooks may rewrite the message, so it is copied back unconditionally.
pub fn nt_user_call_msg_filter(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let msg_ptr = frame.get_ptr();
    let code = frame.get_long();

    if msg_ptr.is_null() {
        return Ok(ctx.service.call_msg_filter(None, code));
    }
    let mut msg: Msg64 = convert::read_native(&*ctx.memory, msg_ptr)?;
    let ret = ctx.service.call_msg_filter(Some(&mut msg), code);
    convert::write_narrow(&mut *ctx.memory, msg_ptr, &msg)?;
    Ok(ret)
}

pub fn nt_user_dispatch_message(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let msg_ptr = frame.get_ptr();

    let msg = if msg_ptr.is_null() {
        None
    } else {
        Some(convert::read_native::<Msg64, _>(&*ctx.memory, msg_ptr)?)
    };
    Ok(truncate_uint_ptr(ctx.service.dispatch_message(msg.as_ref())))
}

/// The message is written back only when one was retrieved: not for
/// `WM_QUIT` (0) and not on error (`~0`).
pub fn nt_user_get_message(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let msg_ptr = frame.get_ptr();
    let hwnd = frame.get_handle();
    let first = frame.get_ulong();
    let last = frame.get_ulong();

    let mut msg = Msg64::default();
    let ret = ctx.service.get_message(&mut msg, hwnd, first, last);
    if ret != 0 && ret != u32::MAX {
        convert::write_narrow(&mut *ctx.memory, msg_ptr, &msg)?;
    }
    Ok(ret)
}

pub fn nt_user_kill_timer(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let id = frame.get_uint_ptr();

    Ok(ctx.service.kill_timer(hwnd, id))
}

/// Not translated; the call is logged and reports 0.
pub fn nt_user_message_call(
    _ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let _hwnd = frame.get_handle();
    let _msg = frame.get_ulong();
    let _wparam = frame.get_ulong();
    let _lparam = frame.get_ulong();
    let _result_info = frame.get_ptr();
    let _kind = frame.get_ulong();
    let _ansi = frame.get_ulong();

    Ok(0)
}

pub fn nt_user_msg_wait_for_multiple_objects_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let count = frame.get_ulong();
    let handles_ptr = frame.get_ptr();
    let timeout = frame.get_ulong();
    let mask = frame.get_ulong();
    let flags = frame.get_ulong();

    let count = count as usize;
    if count > MAXIMUM_WAIT_OBJECTS {
        return Err(Wow64Error::InvalidParameter(format!(
            "{count} wait handles, at most {MAXIMUM_WAIT_OBJECTS} allowed"
        )));
    }
    let staging = ctx.staging();
    let handles =
        buffers::stage_array::<NativeHandle, _>(&staging, &*ctx.memory, handles_ptr, count)?;
    Ok(ctx
        .service
        .msg_wait_for_multiple_objects_ex(&handles, timeout, mask, flags))
}

pub fn nt_user_set_system_timer(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();
    let id = frame.get_uint_ptr();
    let timeout = frame.get_ulong();

    Ok(narrow_uint_ptr(ctx.service.set_system_timer(hwnd, id, timeout)))
}

pub fn nt_user_set_timer(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let hwnd = frame.get_handle();
    let id = frame.get_uint_ptr();
    let timeout = frame.get_ulong();
    let proc = frame.get_ptr();
    let tolerance = frame.get_ulong();

    Ok(narrow_uint_ptr(ctx.service.set_timer(
        hwnd,
        id,
        timeout,
        proc.widen(),
        tolerance,
    )))
}
