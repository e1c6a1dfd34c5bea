// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Clipboard, atom and accelerator-table entry points

use super::{ThunkContext, handle_result, signed_result};
use crate::Result;
use crate::convert::delegated;
use crate::frame::CallFrame;

pub fn nt_user_add_clipboard_format_listener(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();

    Ok(ctx.service.add_clipboard_format_listener(hwnd))
}

pub fn nt_user_get_atom_name(ctx: &mut ThunkContext<'_>, frame: &mut CallFrame<'_>) -> Result<u32> {
    let atom = frame.get_ulong();
    let name = frame.get_ptr();

    let name = delegated::unicode_string_to_native(&*ctx.memory, name)?;
    Ok(ctx.service.get_atom_name(atom, name.as_ref()))
}

pub fn nt_user_get_clipboard_format_name(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let format = frame.get_ulong();
    let buffer = frame.get_ptr();
    let max_len = frame.get_long();

    Ok(signed_result(ctx.service.get_clipboard_format_name(
        format,
        buffer.widen(),
        max_len,
    )))
}

pub fn nt_user_get_clipboard_owner(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(handle_result(ctx.service.get_clipboard_owner()))
}

pub fn nt_user_get_clipboard_sequence_number(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(ctx.service.get_clipboard_sequence_number())
}

pub fn nt_user_get_clipboard_viewer(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(handle_result(ctx.service.get_clipboard_viewer()))
}

pub fn nt_user_get_open_clipboard_window(
    ctx: &mut ThunkContext<'_>,
    _frame: &mut CallFrame<'_>,
) -> Result<u32> {
    Ok(handle_result(ctx.service.get_open_clipboard_window()))
}

pub fn nt_user_remove_clipboard_format_listener(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let hwnd = frame.get_handle();

    Ok(ctx.service.remove_clipboard_format_listener(hwnd))
}

/// `ACCEL` entries are width-independent, so the table pointer is forwarded.
pub fn nt_user_copy_accelerator_table(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let src = frame.get_handle();
    let dst = frame.get_ptr();
    let count = frame.get_long();

    Ok(signed_result(
        ctx.service.copy_accelerator_table(src, dst.widen(), count),
    ))
}

pub fn nt_user_create_accelerator_table(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let table = frame.get_ptr();
    let count = frame.get_long();

    Ok(handle_result(
        ctx.service.create_accelerator_table(table.widen(), count),
    ))
}

pub fn nt_user_destroy_accelerator_table(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let table = frame.get_handle();

    Ok(ctx.service.destroy_accelerator_table(table))
}
