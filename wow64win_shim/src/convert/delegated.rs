// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! String-descriptor and object-attributes conversion
//!
//! Both are narrow-to-native only. A null narrow pointer stays absent.

use crate::Result;
use crate::convert;
use crate::layout::{ObjectAttributes32, StructKind, UnicodeString64};
use crate::memory::{self, GuestMemory};
use crate::width::{NarrowPtr, NativeHandle, NativePtr};

/// Native object attributes with the object name already widened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeObjectAttributes {
    /// Native structure length, or 0 if the caller declared a bad length
    pub length: u32,
    pub root_directory: NativeHandle,
    pub object_name: Option<UnicodeString64>,
    pub attributes: u32,
    /// Passed through untranslated
    pub security_descriptor: NativePtr,
    pub security_quality_of_service: NativePtr,
}

/// Widen the `UNICODE_STRING` at `ptr`.
pub fn unicode_string_to_native<M: GuestMemory + ?Sized>(
    mem: &M,
    ptr: NarrowPtr,
) -> Result<Option<UnicodeString64>> {
    if ptr.is_null() {
        return Ok(None);
    }
    convert::read_native::<UnicodeString64, _>(mem, ptr).map(Some)
}

/// Widen the `OBJECT_ATTRIBUTES` at `ptr`.
///
/// A declared length other than the narrow size is forwarded as 0, which the
/// native service rejects.
pub fn object_attributes_to_native<M: GuestMemory + ?Sized>(
    mem: &M,
    ptr: NarrowPtr,
) -> Result<Option<NativeObjectAttributes>> {
    if ptr.is_null() {
        return Ok(None);
    }
    let attr: ObjectAttributes32 = memory::read_struct(mem, ptr)?;
    let length = if attr.length == StructKind::ObjectAttributes.narrow_size() {
        StructKind::ObjectAttributes.native_size()
    } else {
        0
    };
    Ok(Some(NativeObjectAttributes {
        length,
        root_directory: attr.root_directory.sign_extend(),
        object_name: unicode_string_to_native(mem, attr.object_name)?,
        attributes: attr.attributes,
        security_descriptor: attr.security_descriptor.widen(),
        security_quality_of_service: attr.security_quality_of_service.widen(),
    }))
}
