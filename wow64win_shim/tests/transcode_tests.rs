// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Structure transcoding through guest memory
//!
//! These tests exercise the public conversion helpers against a small flat
//! address space, the same way entry points use them.

use wow64win_shim::convert::menu::{self, MenuItemTransfer};
use wow64win_shim::convert::{self, delegated};
use wow64win_shim::layout::{
    MenuItemInfo32, MenuItemInfo64, Msg32, Msg64, ObjectAttributes32, Point, StructKind,
    UnicodeString32,
};
use wow64win_shim::{GuestMemory, NarrowHandle, NarrowPtr, NativeHandle, NativePtr, Wow64Error};
use zerocopy::IntoBytes;

const BASE: u32 = 0x0001_0000;

/// Flat image mapped at [`BASE`]
struct Image(Vec<u8>);

impl Image {
    fn new() -> Self {
        Self(vec![0; 0x400])
    }

    fn put(&mut self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        self.0[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl GuestMemory for Image {
    fn read(&self, addr: NarrowPtr, buf: &mut [u8]) -> wow64win_shim::Result<()> {
        let start = addr
            .0
            .checked_sub(BASE)
            .ok_or(Wow64Error::AccessViolation(addr.0))? as usize;
        let bytes = self
            .0
            .get(start..start + buf.len())
            .ok_or(Wow64Error::AccessViolation(addr.0))?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    fn write(&mut self, addr: NarrowPtr, data: &[u8]) -> wow64win_shim::Result<()> {
        let start = addr
            .0
            .checked_sub(BASE)
            .ok_or(Wow64Error::AccessViolation(addr.0))? as usize;
        let bytes = self
            .0
            .get_mut(start..start + data.len())
            .ok_or(Wow64Error::AccessViolation(addr.0))?;
        bytes.copy_from_slice(data);
        Ok(())
    }
}

fn at(offset: u32) -> NarrowPtr {
    NarrowPtr(BASE + offset)
}

#[test]
fn test_layout_sizes() {
    let expected = [
        (StructKind::Msg, 28, 48),
        (StructKind::GuiThreadInfo, 48, 72),
        (StructKind::MenuInfo, 28, 40),
        (StructKind::MenuItemInfo, 48, 80),
        (StructKind::TitleBarInfo, 44, 44),
        (StructKind::RawInputHeader, 16, 24),
        (StructKind::RawInputDevice, 12, 16),
        (StructKind::RawInputDeviceList, 8, 16),
        (StructKind::MouseMovePoint, 16, 24),
        (StructKind::UnicodeString, 8, 16),
        (StructKind::ObjectAttributes, 24, 48),
        (StructKind::Handle, 4, 8),
    ];
    for (kind, narrow, native) in expected {
        assert_eq!(kind.narrow_size(), narrow, "{}", kind.name());
        assert_eq!(kind.native_size(), native, "{}", kind.name());
    }
}

#[test]
fn test_msg_narrowing_truncates_params() {
    let mut image = Image::new();
    let native = Msg64 {
        hwnd: NativeHandle(0x0001_0020),
        message: 0x0201,
        w_param: 0xAAAA_BBBB_0000_0001,
        l_param: 0x0000_0000_0032_0064,
        time: 77,
        pt: Point { x: 100, y: 50 },
        ..Msg64::default()
    };
    convert::write_narrow(&mut image, at(0x40), &native).unwrap();

    let narrow: Msg32 = wow64win_shim::memory::read_struct(&image, at(0x40)).unwrap();
    assert_eq!(narrow.hwnd, NarrowHandle(0x0001_0020));
    assert_eq!(narrow.w_param, 1);
    assert_eq!(narrow.l_param, 0x0032_0064);

    let widened: Msg64 = convert::read_native(&image, at(0x40)).unwrap();
    assert_eq!(widened.w_param, 1);
    assert_eq!(widened.pt, native.pt);
}

#[test]
fn test_menu_item_declared_size_checked_first() {
    let mut image = Image::new();
    image.put(0x80, &80u32.to_le_bytes());

    let err = convert::read_sized::<MenuItemInfo64, _>(&image, at(0x80)).unwrap_err();
    assert_eq!(
        err,
        Wow64Error::SizeMismatch {
            kind: "MENUITEMINFOW",
            declared: 80,
            expected: 48,
        }
    );
}

#[test]
fn test_menu_item_input_carries_both_bitmaps() {
    let mut image = Image::new();
    let item = MenuItemInfo32 {
        cb_size: 48,
        f_mask: 0x80,
        hbmp_checked: NarrowHandle(0x51),
        hbmp_unchecked: NarrowHandle(0x52),
        dw_type_data: at(0x200),
        cch: 12,
        ..MenuItemInfo32::default()
    };
    image.put(0x80, item.as_bytes());

    let narrow = convert::read_sized::<MenuItemInfo64, _>(&image, at(0x80)).unwrap();
    let staged = menu::stage_item(menu::transfer_for(1), &narrow);
    assert_eq!(staged.cb_size, 80);
    assert_eq!(staged.hbmp_checked, NativeHandle(0x51));
    assert_eq!(staged.hbmp_unchecked, NativeHandle(0x52));

    let query = menu::stage_item(MenuItemTransfer::Output, &narrow);
    assert_eq!(query.hbmp_checked, NativeHandle::NULL);
    assert_eq!(query.dw_type_data, NativePtr(u64::from(BASE + 0x200)));
    assert_eq!(query.cch, 12);
}

#[test]
fn test_object_attributes_widening() {
    let mut image = Image::new();
    let name = UnicodeString32 {
        length: 8,
        maximum_length: 10,
        buffer: at(0x300),
    };
    image.put(0x100, name.as_bytes());
    let attr = ObjectAttributes32 {
        length: 24,
        root_directory: NarrowHandle(0xFFFF_FFFC),
        object_name: at(0x100),
        attributes: 0x40,
        ..ObjectAttributes32::default()
    };
    image.put(0x140, attr.as_bytes());

    let native = delegated::object_attributes_to_native(&image, at(0x140))
        .unwrap()
        .unwrap();
    assert_eq!(native.length, 48);
    assert_eq!(native.root_directory, NativeHandle(0xFFFF_FFFF_FFFF_FFFC));
    let object_name = native.object_name.unwrap();
    assert_eq!(object_name.length, 8);
    assert_eq!(object_name.buffer, NativePtr(u64::from(BASE + 0x300)));

    // A bad declared length is forwarded as 0 rather than rejected here
    image.put(0x140, &20u32.to_le_bytes());
    let native = delegated::object_attributes_to_native(&image, at(0x140))
        .unwrap()
        .unwrap();
    assert_eq!(native.length, 0);

    assert_eq!(
        delegated::object_attributes_to_native(&image, NarrowPtr::NULL),
        Ok(None)
    );
}

#[test]
fn test_unmapped_reads_fault() {
    let image = Image::new();
    assert_eq!(
        convert::read_native::<Msg64, _>(&image, NarrowPtr(0x10)),
        Err(Wow64Error::AccessViolation(0x10))
    );
}
