// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Raw input entry points
//!
//! Every entry point here checks the caller's declared header or element size
//! before anything else, and forwards the native size to the service.

use super::ThunkContext;
use crate::buffers::{self, NativeFill, RecordLayout, RecordOutcome};
use crate::frame::CallFrame;
use crate::layout::{RawInputDevice64, RawInputDeviceList64, RawInputHeader64, StructKind};
use crate::memory;
use crate::service::raw_input::{RID_HEADER, RID_INPUT};
use crate::{Result, Wow64Error};

type RawInputRecord = RecordLayout<RawInputHeader64>;

/// The service hands back a batch already laid out for the caller, so only
/// the header size is translated.
pub fn nt_user_get_raw_input_buffer(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let data = frame.get_ptr();
    let data_size = frame.get_ptr();
    let header_size = frame.get_ulong();

    StructKind::RawInputHeader.expect_narrow_size(header_size)?;
    Ok(ctx.service.get_raw_input_buffer(
        data.widen(),
        data_size.widen(),
        RawInputRecord::NATIVE_HEADER,
    ))
}

/// `RID_INPUT` without a buffer reports the narrow record size in
/// `*data_size`; with one it fills at most `*data_size` bytes. `RID_HEADER`
/// copies the header only.
pub fn nt_user_get_raw_input_data(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let handle = frame.get_handle();
    let command = frame.get_ulong();
    let data = frame.get_ptr();
    let data_size = frame.get_ptr();
    let header_size = frame.get_ulong();

    StructKind::RawInputHeader.expect_narrow_size(header_size)?;
    let record = RawInputRecord::new();
    let native_header = RawInputRecord::NATIVE_HEADER;

    let outcome = match command {
        RID_INPUT if data.is_null() => {
            let outcome = record.query(|size| {
                ctx.service
                    .get_raw_input_data(handle, command, None, size, native_header)
            })?;
            if let RecordOutcome::Bytes(needed) = outcome {
                memory::write_u32(&mut *ctx.memory, data_size, needed)?;
                return Ok(0);
            }
            outcome
        }
        RID_INPUT => {
            let capacity = memory::read_u32(&*ctx.memory, data_size)?;
            let staging = ctx.staging();
            record.fill(&staging, &mut *ctx.memory, data, capacity, |buf, size| {
                ctx.service
                    .get_raw_input_data(handle, command, Some(buf), size, native_header)
            })?
        }
        RID_HEADER if data.is_null() => {
            memory::write_u32(&mut *ctx.memory, data_size, RawInputRecord::NARROW_HEADER)?;
            return Ok(0);
        }
        RID_HEADER => {
            let capacity = memory::read_u32(&*ctx.memory, data_size)?;
            record.fetch_header(&mut *ctx.memory, data, capacity, |buf, size| {
                ctx.service
                    .get_raw_input_data(handle, command, Some(buf), size, native_header)
            })?
        }
        _ => {
            return Err(Wow64Error::InvalidParameter(format!(
                "raw input command 0x{command:08X}"
            )));
        }
    };

    Ok(match outcome {
        RecordOutcome::Failed(ret) | RecordOutcome::Bytes(ret) => ret,
    })
}

/// Device names and info blocks have the same layout at both widths.
pub fn nt_user_get_raw_input_device_info(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let handle = frame.get_handle();
    let command = frame.get_ulong();
    let data = frame.get_ptr();
    let data_size = frame.get_ptr();

    Ok(ctx
        .service
        .get_raw_input_device_info(handle, command, data.widen(), data_size.widen()))
}

pub fn nt_user_get_raw_input_device_list(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let devices = frame.get_ptr();
    let count_ptr = frame.get_ptr();
    let size = frame.get_ulong();

    StructKind::RawInputDeviceList.expect_narrow_size(size)?;
    let native_size = StructKind::RawInputDeviceList.native_size();

    if devices.is_null() {
        let mut count = 0;
        let ret = ctx
            .service
            .get_raw_input_device_list(None, &mut count, native_size);
        memory::write_u32(&mut *ctx.memory, count_ptr, count)?;
        return Ok(ret);
    }

    let mut count = memory::read_u32(&*ctx.memory, count_ptr)?;
    let staging = ctx.staging();
    let fill = buffers::fill_array::<RawInputDeviceList64>(&staging, count as usize, |list| {
        NativeFill::counted(ctx.service.get_raw_input_device_list(
            Some(list),
            &mut count,
            native_size,
        ))
    })?;
    let ret = fill.store(&mut *ctx.memory, devices)?;
    memory::write_u32(&mut *ctx.memory, count_ptr, count)?;
    Ok(ret)
}

pub fn nt_user_get_registered_raw_input_devices(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let devices = frame.get_ptr();
    let count_ptr = frame.get_ptr();
    let size = frame.get_ulong();

    StructKind::RawInputDevice.expect_narrow_size(size)?;
    let native_size = StructKind::RawInputDevice.native_size();

    if devices.is_null() {
        let mut count = 0;
        let ret = ctx
            .service
            .get_registered_raw_input_devices(None, &mut count, native_size);
        memory::write_u32(&mut *ctx.memory, count_ptr, count)?;
        return Ok(ret);
    }

    let mut count = memory::read_u32(&*ctx.memory, count_ptr)?;
    let staging = ctx.staging();
    let fill = buffers::fill_array::<RawInputDevice64>(&staging, count as usize, |list| {
        NativeFill::counted(ctx.service.get_registered_raw_input_devices(
            Some(list),
            &mut count,
            native_size,
        ))
    })?;
    let ret = fill.store(&mut *ctx.memory, devices)?;
    memory::write_u32(&mut *ctx.memory, count_ptr, count)?;
    Ok(ret)
}

pub fn nt_user_register_raw_input_devices(
    ctx: &mut ThunkContext<'_>,
    frame: &mut CallFrame<'_>,
) -> Result<u32> {
    let devices = frame.get_ptr();
    let count = frame.get_ulong();
    let size = frame.get_ulong();

    StructKind::RawInputDevice.expect_narrow_size(size)?;
    let staging = ctx.staging();
    let native = buffers::stage_array::<RawInputDevice64, _>(
        &staging,
        &*ctx.memory,
        devices,
        count as usize,
    )?;
    Ok(ctx
        .service
        .register_raw_input_devices(&native, StructKind::RawInputDevice.native_size()))
}
