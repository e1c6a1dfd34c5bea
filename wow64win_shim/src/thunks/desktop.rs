// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Desktop, window station, hook, event and DPI entry points
//!
//! Object attributes are rebuilt at native width before the service sees
//! them; a null attributes pointer stays null.

use super::{ThunkContext, handle_result};
use crate::Result;
use crate::convert::delegated;
use crate::error::status::STATUS_NOT_SUPPORTED;
use crate::frame::CallFrame;

pub fn nt_user_close_desktop(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let desktop = frame.get_handle();

    Ok(ctx.service.close_desktop(desktop))
}

pub fn nt_user_close_window_station(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let winsta = frame.get_handle();

    Ok(ctx.service.close_window_station(winsta))
}

pub fn nt_user_create_desktop_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let attr = frame.get_ptr();
    let device = frame.get_ptr();
    let devmode = frame.get_ptr();
    let flags = frame.get_ulong();
    let access = frame.get_ulong();
    let heap_size = frame.get_ulong();

    let attr = delegated::object_attributes_to_native(&*ctx.memory, attr)?;
    let device = delegated::unicode_string_to_native(&*ctx.memory, device)?;
    Ok(handle_result(ctx.service.create_desktop_ex(
        attr.as_ref(),
        device.as_ref(),
        devmode.widen(),
        flags,
        access,
        heap_size,
    )))
}

/// Trailing arguments are undocumented and forwarded as-is.
pub fn nt_user_create_window_station(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let attr = frame.get_ptr();
    let access = frame.get_ulong();
    let arg3 = frame.get_ulong();
    let arg4 = frame.get_ulong();
    let arg5 = frame.get_ulong();
    let arg6 = frame.get_ulong();
    let arg7 = frame.get_ulong();

    let attr = delegated::object_attributes_to_native(&*ctx.memory, attr)?;
    Ok(handle_result(ctx.service.create_window_station(
        attr.as_ref(),
        access,
        arg3,
        arg4,
        arg5,
        arg6,
        arg7,
    )))
}

pub fn nt_user_get_object_information(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let handle = frame.get_handle();
    let index = frame.get_long();
    let info = frame.get_ptr();
    let len = frame.get_ulong();
    let needed = frame.get_ptr();

    Ok(ctx
        .service
        .get_object_information(handle, index, info.widen(), len, needed.widen()))
}

pub fn nt_user_get_process_window_station(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(handle_result(ctx.service.get_process_window_station()))
}

pub fn nt_user_get_thread_desktop(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let thread_id = frame.get_ulong();

    Ok(handle_result(ctx.service.get_thread_desktop(thread_id)))
}

pub fn nt_user_open_desktop(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let attr = frame.get_ptr();
    let flags = frame.get_ulong();
    let access = frame.get_ulong();

    let attr = delegated::object_attributes_to_native(&*ctx.memory, attr)?;
    Ok(handle_result(
        ctx.service.open_desktop(attr.as_ref(), flags, access),
    ))
}

pub fn nt_user_open_input_desktop(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let flags = frame.get_ulong();
    let inherit = frame.get_ulong();
    let access = frame.get_ulong();

    Ok(handle_result(
        ctx.service.open_input_desktop(flags, inherit, access),
    ))
}

pub fn nt_user_open_window_station(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let attr = frame.get_ptr();
    let access = frame.get_ulong();

    let attr = delegated::object_attributes_to_native(&*ctx.memory, attr)?;
    Ok(handle_result(
        ctx.service.open_window_station(attr.as_ref(), access),
    ))
}

pub fn nt_user_set_object_information(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let handle = frame.get_handle();
    let index = frame.get_long();
    let info = frame.get_ptr();
    let len = frame.get_ulong();

    Ok(ctx
        .service
        .set_object_information(handle, index, info.widen(), len))
}

pub fn nt_user_set_process_window_station(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let winsta = frame.get_handle();

    Ok(ctx.service.set_process_window_station(winsta))
}

pub fn nt_user_set_thread_desktop(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let desktop = frame.get_handle();

    Ok(ctx.service.set_thread_desktop(desktop))
}

/// Always reports 0.
pub fn nt_user_notify_win_event(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let event = frame.get_ulong();
    let hwnd = frame.get_handle();
    let object_id = frame.get_long();
    let child_id = frame.get_long();

    ctx.service.notify_win_event(event, hwnd, object_id, child_id);
    Ok(0)
}

pub fn nt_user_set_win_event_hook(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let event_min = frame.get_ulong();
    let event_max = frame.get_ulong();
    let inst = frame.get_handle();
    let module = frame.get_ptr();
    let proc = frame.get_ptr();
    let pid = frame.get_ulong();
    let tid = frame.get_ulong();
    let flags = frame.get_ulong();

    let module = delegated::unicode_string_to_native(&*ctx.memory, module)?;
    Ok(handle_result(ctx.service.set_win_event_hook(
        event_min,
        event_max,
        inst,
        module.as_ref(),
        proc.widen(),
        pid,
        tid,
        flags,
    )))
}

pub fn nt_user_set_windows_hook_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let inst = frame.get_handle();
    let module = frame.get_ptr();
    let tid = frame.get_ulong();
    let id = frame.get_long();
    let proc = frame.get_ptr();
    let ansi = frame.get_ulong();

    let module = delegated::unicode_string_to_native(&*ctx.memory, module)?;
    Ok(handle_result(ctx.service.set_windows_hook_ex(
        inst,
        module.as_ref(),
        tid,
        id,
        proc.widen(),
        ansi,
    )))
}

pub fn nt_user_unhook_win_event(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hook = frame.get_handle();

    Ok(ctx.service.unhook_win_event(hook))
}

pub fn nt_user_unhook_windows_hook_ex(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hook = frame.get_handle();

    Ok(ctx.service.unhook_windows_hook_ex(hook))
}

pub fn nt_user_get_dpi_for_monitor(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let monitor = frame.get_handle();
    let kind = frame.get_ulong();
    let x = frame.get_ptr();
    let y = frame.get_ptr();

    Ok(ctx
        .service
        .get_dpi_for_monitor(monitor, kind, x.widen(), y.widen()))
}

pub fn nt_user_get_process_dpi_awareness_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let process = frame.get_handle();

    Ok(ctx.service.get_process_dpi_awareness_context(process))
}

pub fn nt_user_get_system_dpi_for_process(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let process = frame.get_handle();

    Ok(ctx.service.get_system_dpi_for_process(process))
}

pub fn nt_user_set_process_dpi_awareness_context(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let awareness = frame.get_ulong();
    let unknown = frame.get_ulong();

    Ok(ctx
        .service
        .set_process_dpi_awareness_context(awareness, unknown))
}

/// Client callback tables cannot be registered from a narrow process; the
/// arguments are not read.
pub fn nt_user_initialize_client_pfn_arrays(
    _ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(STATUS_NOT_SUPPORTED)
}
