// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! End-to-end entry-point tests over the headless service
//!
//! Argument slots go through the dispatcher, structures are read from and
//! written to a flat guest mapping, and the service's call log shows what
//! crossed to the native side.

use wow64win_platform_headless::{
    FlatGuestMemory, HeadlessDesktop, HeadlessWin32u, ThreadErrorState,
};
use wow64win_shim::error::last_error::{
    ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_PARAMETER, ERROR_NOT_ENOUGH_MEMORY,
};
use wow64win_shim::error::status::{
    STATUS_ACCESS_VIOLATION, STATUS_BUFFER_TOO_SMALL, STATUS_NOT_SUPPORTED,
};
use wow64win_shim::layout::{
    GuiThreadInfo32, MenuInfo32, MenuItemInfo32, MouseMovePoint32, Msg32, Point,
    RawInputDevice32, RawInputHeader32,
};
use wow64win_shim::service::raw_input::{RID_HEADER, RID_INPUT};
use wow64win_shim::{
    DispatchError, Dispatcher, LastErrorSink, NarrowHandle, NarrowPtr, NativeHandle,
    StagingConfig, ThunkContext,
};
use zerocopy::IntoBytes;

const BASE: u32 = 0x0040_0000;
const POISON: u8 = 0xCC;

/// Guest memory, service and last error of one narrow thread
struct Harness {
    memory: FlatGuestMemory,
    service: HeadlessWin32u,
    errors: ThreadErrorState,
    staging: StagingConfig,
}

impl Harness {
    fn new(desktop: HeadlessDesktop) -> Self {
        Self {
            memory: FlatGuestMemory::new(BASE, 0x1_0000).expect("guest mapping"),
            service: HeadlessWin32u::with_desktop(desktop),
            errors: ThreadErrorState::new(),
            staging: StagingConfig::default(),
        }
    }

    fn demo() -> Self {
        Self::new(HeadlessDesktop::demo())
    }

    fn call(&mut self, name: &str, slots: &[u32]) -> Result<u32, DispatchError> {
        let mut ctx = ThunkContext::new(&mut self.memory, &mut self.service, &mut self.errors)
            .with_staging(self.staging);
        Dispatcher::new().call(name, &mut ctx, slots)
    }

    fn at(&self, offset: u32) -> NarrowPtr {
        self.memory.at(offset)
    }

    fn poison(&mut self, offset: u32, len: usize) {
        self.memory
            .load(self.at(offset), &vec![POISON; len])
            .expect("poison");
    }

    fn put_u32(&mut self, offset: u32, value: u32) {
        self.memory.place(self.at(offset), &value).expect("store");
    }

    fn get_u32(&self, offset: u32) -> u32 {
        self.memory.fetch(self.at(offset)).expect("load")
    }
}

#[test]
fn test_raw_input_data_exact_buffer() {
    let mut h = Harness::demo();
    let (data, size) = (h.at(0x100).0, h.at(0x80).0);

    // Size query first: 16-byte narrow header plus the 12-byte mouse body
    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0001, RID_INPUT, 0, size, 16])
        .unwrap();
    assert_eq!(ret, 0);
    assert_eq!(h.get_u32(0x80), 28);

    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0001, RID_INPUT, data, size, 16])
        .unwrap();
    assert_eq!(ret, 28);
    let header: RawInputHeader32 = h.memory.fetch(h.at(0x100)).unwrap();
    assert_eq!(header.dw_type, 0);
    assert_eq!(header.dw_size, 28);
    assert_eq!(header.h_device, NarrowHandle(0x0001_0101));
    assert_eq!(
        h.memory.dump(h.at(0x110), 12).unwrap(),
        &[0x01, 0, 0, 0, 0x05, 0, 0, 0, 0xFB, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn test_raw_input_data_one_byte_short() {
    let mut h = Harness::demo();
    let (data, size) = (h.at(0x100).0, h.at(0x80).0);
    h.poison(0x100, 28);
    h.put_u32(0x80, 27);

    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0001, RID_INPUT, data, size, 16])
        .unwrap();
    assert_eq!(ret, u32::MAX);
    assert_eq!(h.errors.last_error(), ERROR_INSUFFICIENT_BUFFER);
    assert!(h.memory.dump(h.at(0x100), 28).unwrap().iter().all(|b| *b == POISON));
}

#[test]
fn test_raw_input_data_body_fault_writes_nothing() {
    let mut h = Harness::demo();
    // 20 mapped bytes for a 28-byte record
    let end = u32::try_from(h.memory.size()).unwrap();
    let (data, size) = (h.at(end - 20).0, h.at(0x80).0);
    h.poison(end - 20, 20);
    h.put_u32(0x80, 28);

    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0001, RID_INPUT, data, size, 16])
        .unwrap();
    assert_eq!(ret, STATUS_ACCESS_VIOLATION);
    assert_eq!(h.errors.updates(), 0);
    assert!(h.memory.dump(h.at(end - 20), 20).unwrap().iter().all(|b| *b == POISON));
}

#[test]
fn test_raw_input_header_only() {
    let mut h = Harness::demo();
    let (data, size) = (h.at(0x100).0, h.at(0x80).0);
    h.put_u32(0x80, 16);

    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0002, RID_HEADER, data, size, 16])
        .unwrap();
    assert_eq!(ret, 16);
    let header: RawInputHeader32 = h.memory.fetch(h.at(0x100)).unwrap();
    assert_eq!(header.dw_type, 1);
    assert_eq!(header.h_device, NarrowHandle(0x0001_0102));
}

#[test]
fn test_raw_input_wrong_header_size_never_reaches_service() {
    let mut h = Harness::demo();
    let size = h.at(0x80).0;

    let ret = h
        .call("NtUserGetRawInputData", &[0x0002_0001, RID_INPUT, 0, size, 24])
        .unwrap();
    assert_eq!(ret, u32::MAX);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
    assert_eq!(h.service.call_count(), 0);
}

#[test]
fn test_build_hwnd_list_converts_only_written_handles() {
    let mut h = Harness::demo();
    h.staging = StagingConfig::default().with_fill(POISON);
    h.poison(0x200, 5 * 4);
    let (buffer, size) = (h.at(0x200).0, h.at(0x80).0);

    let ret = h
        .call("NtUserBuildHwndList", &[0, 0, 0, 0, 0, 5, buffer, size])
        .unwrap();
    assert_eq!(ret, 0);
    assert_eq!(h.get_u32(0x80), 3);
    assert_eq!(h.get_u32(0x200), 0x0001_0020);
    assert_eq!(h.get_u32(0x204), 0x0001_0024);
    assert_eq!(h.get_u32(0x208), 0x0001_0028);
    assert!(
        h.memory
            .dump(h.at(0x20C), 8)
            .unwrap()
            .iter()
            .all(|b| *b == POISON)
    );
}

#[test]
fn test_build_hwnd_list_too_small_reports_size() {
    let mut h = Harness::demo();
    h.poison(0x200, 8);
    let (buffer, size) = (h.at(0x200).0, h.at(0x80).0);

    let ret = h
        .call("NtUserBuildHwndList", &[0, 0, 0, 0, 0, 2, buffer, size])
        .unwrap();
    assert_eq!(ret, STATUS_BUFFER_TOO_SMALL);
    assert_eq!(h.get_u32(0x80), 3);
    assert!(h.memory.dump(h.at(0x200), 8).unwrap().iter().all(|b| *b == POISON));
}

#[test]
fn test_build_hwnd_list_array_fault_leaves_size() {
    let mut h = Harness::demo();
    // Room for two of the three handles before the mapping ends
    let end = u32::try_from(h.memory.size()).unwrap();
    let (buffer, size) = (h.at(end - 8).0, h.at(0x80).0);
    h.poison(0x80, 4);

    let ret = h
        .call("NtUserBuildHwndList", &[0, 0, 0, 0, 0, 5, buffer, size])
        .unwrap();
    assert_eq!(ret, STATUS_ACCESS_VIOLATION);
    assert_eq!(h.get_u32(0x80), 0xCCCC_CCCC);
    assert!(h.memory.dump(h.at(end - 8), 8).unwrap().iter().all(|b| *b == 0));
}

#[test]
fn test_get_message_round_trip() {
    let mut h = Harness::demo();
    let msg = h.at(0x300).0;

    assert_eq!(h.call("NtUserGetMessage", &[msg, 0, 0, 0]).unwrap(), 1);
    let first: Msg32 = h.memory.fetch(h.at(0x300)).unwrap();
    assert_eq!(
        first,
        Msg32 {
            hwnd: NarrowHandle(0x0001_0020),
            message: 0x0100,
            w_param: 0x41,
            l_param: 0x001E_0001,
            time: 1000,
            pt: Point { x: 120, y: 80 },
        }
    );

    assert_eq!(h.call("NtUserGetMessage", &[msg, 0, 0, 0]).unwrap(), 1);
    assert_eq!(h.call("NtUserGetMessage", &[msg, 0, 0, 0]).unwrap(), 1);
    let timer: Msg32 = h.memory.fetch(h.at(0x300)).unwrap();
    assert_eq!(timer.message, 0x0113);

    // WM_QUIT returns 0 and leaves the caller's block alone
    assert_eq!(h.call("NtUserGetMessage", &[msg, 0, 0, 0]).unwrap(), 0);
    let after: Msg32 = h.memory.fetch(h.at(0x300)).unwrap();
    assert_eq!(after, timer);
}

#[test]
fn test_get_message_unmapped_block_faults() {
    let mut h = Harness::demo();

    let ret = h.call("NtUserGetMessage", &[0x10, 0, 0, 0]).unwrap();
    assert_eq!(ret, STATUS_ACCESS_VIOLATION);
    assert_eq!(h.errors.updates(), 0);
}

#[test]
fn test_registered_devices_bad_size() {
    let mut h = Harness::demo();
    let (list, count) = (h.at(0x400).0, h.at(0x80).0);
    h.put_u32(0x80, 4);

    let ret = h
        .call("NtUserGetRegisteredRawInputDevices", &[list, count, 16])
        .unwrap();
    assert_eq!(ret, u32::MAX);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
    assert_eq!(h.service.call_count(), 0);
}

#[test]
fn test_registered_devices_two_phase() {
    let mut h = Harness::demo();
    let (list, count) = (h.at(0x400).0, h.at(0x80).0);

    let ret = h
        .call("NtUserGetRegisteredRawInputDevices", &[0, count, 12])
        .unwrap();
    assert_eq!(ret, 0);
    assert_eq!(h.get_u32(0x80), 1);

    let ret = h
        .call("NtUserGetRegisteredRawInputDevices", &[list, count, 12])
        .unwrap();
    assert_eq!(ret, 1);
    let device: RawInputDevice32 = h.memory.fetch(h.at(0x400)).unwrap();
    assert_eq!(
        device,
        RawInputDevice32 {
            us_usage_page: 1,
            us_usage: 2,
            dw_flags: 0,
            hwnd_target: NarrowHandle(0x0001_0020),
        }
    );
}

#[test]
fn test_register_devices_round_trip() {
    let mut h = Harness::new(HeadlessDesktop::new());
    let device = RawInputDevice32 {
        us_usage_page: 1,
        us_usage: 6,
        dw_flags: 0,
        hwnd_target: NarrowHandle(0x0001_0020),
    };
    h.memory.place(h.at(0x400), &device).unwrap();
    let list = h.at(0x400).0;

    assert_eq!(
        h.call("NtUserRegisterRawInputDevices", &[list, 1, 12]).unwrap(),
        1
    );
    let registered = &h.service.desktop().registered;
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].hwnd_target, NativeHandle(0x0001_0020));
}

#[test]
fn test_staging_budget_exhaustion() {
    let mut h = Harness::new(HeadlessDesktop::new());
    h.staging = StagingConfig::default().with_limit(64);
    let list = h.at(0x400).0;

    let ret = h
        .call("NtUserRegisterRawInputDevices", &[list, 8, 12])
        .unwrap();
    assert_eq!(ret, 0);
    assert_eq!(h.errors.last_error(), ERROR_NOT_ENOUGH_MEMORY);
    assert_eq!(h.service.call_count(), 0);
}

#[test]
fn test_frame_handles_are_sign_extended() {
    let mut h = Harness::demo();

    assert_eq!(h.call("NtUserGetAncestor", &[0xFFFF_FFF0, 1]).unwrap(), 0);
    let call = h.service.last_call().unwrap();
    assert_eq!(call.name, "GetAncestor");
    assert_eq!(call.handles, vec![NativeHandle(0xFFFF_FFFF_FFFF_FFF0)]);
}

#[test]
fn test_wait_handles_are_zero_extended() {
    let mut h = Harness::demo();
    let handles = [0xFFFF_FFF0u32, 0x0000_0010];
    h.memory.load(h.at(0x500), handles.as_bytes()).unwrap();
    let ptr = h.at(0x500).0;

    let ret = h
        .call("NtUserMsgWaitForMultipleObjectsEx", &[2, ptr, 0, 0xFF, 0])
        .unwrap();
    // Messages are queued, so the wait ends on input
    assert_eq!(ret, 2);
    assert_eq!(
        h.service.last_wait_handles(),
        &[NativeHandle(0xFFFF_FFF0), NativeHandle(0x10)]
    );
}

#[test]
fn test_too_many_wait_handles() {
    let mut h = Harness::demo();
    let ptr = h.at(0x500).0;

    let ret = h
        .call("NtUserMsgWaitForMultipleObjectsEx", &[65, ptr, 0, 0xFF, 0])
        .unwrap();
    assert_eq!(ret, u32::MAX);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
}

#[test]
fn test_gui_thread_info_checks_declared_size() {
    let mut h = Harness::demo();
    let info = h.at(0x600).0;

    h.put_u32(0x600, 72);
    assert_eq!(h.call("NtUserGetGUIThreadInfo", &[0, info]).unwrap(), 0);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);

    h.put_u32(0x600, 48);
    assert_eq!(h.call("NtUserGetGUIThreadInfo", &[0, info]).unwrap(), 1);
    let narrow: GuiThreadInfo32 = h.memory.fetch(h.at(0x600)).unwrap();
    assert_eq!(narrow.cb_size, 48);
    assert_eq!(narrow.hwnd_active, NarrowHandle(0x0001_0020));
    assert_eq!(narrow.hwnd_focus, NarrowHandle(0x0001_002C));
    assert_eq!(narrow.rc_caret.bottom, 20);
}

const MENU: u32 = 0x0001_0050;
const MIIM_ID: u32 = 0x2;

#[test]
fn test_menu_info_declared_size() {
    let mut h = Harness::demo();
    let info = h.at(0x700).0;

    // A null block reaches the service as absent
    assert_eq!(h.call("NtUserThunkedMenuInfo", &[MENU, 0]).unwrap(), 0);
    assert_eq!(h.service.call_count(), 1);
    assert_eq!(h.errors.updates(), 0);

    let wide = MenuInfo32 {
        cb_size: 40,
        ..MenuInfo32::default()
    };
    h.memory.place(h.at(0x700), &wide).unwrap();
    assert_eq!(h.call("NtUserThunkedMenuInfo", &[MENU, info]).unwrap(), 0);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
    assert_eq!(h.service.call_count(), 1);

    h.put_u32(0x700, 28);
    assert_eq!(h.call("NtUserThunkedMenuInfo", &[MENU, info]).unwrap(), 1);
    assert_eq!(h.service.call_count(), 2);
}

#[test]
fn test_menu_item_wrong_size_never_reaches_service() {
    let mut h = Harness::demo();
    let info = h.at(0x700).0;
    h.put_u32(0x700, 80);

    let ret = h
        .call("NtUserThunkedMenuItemInfo", &[MENU, 3, 0, 1, info, 0])
        .unwrap();
    assert_eq!(ret, 0);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
    assert_eq!(h.service.call_count(), 0);
}

#[test]
fn test_menu_item_insert_then_get() {
    let mut h = Harness::demo();
    let info = h.at(0x700).0;

    let inserted = MenuItemInfo32 {
        cb_size: 48,
        f_mask: 0x1FF,
        w_id: 77,
        hbmp_checked: NarrowHandle(0x51),
        hbmp_unchecked: NarrowHandle(0x52),
        dw_type_data: h.at(0x800),
        cch: 5,
        ..MenuItemInfo32::default()
    };
    h.memory.place(h.at(0x700), &inserted).unwrap();
    assert_eq!(
        h.call("NtUserThunkedMenuItemInfo", &[MENU, 3, 0, 1, info, 0])
            .unwrap(),
        1
    );
    // Insert is input only
    let after: MenuItemInfo32 = h.memory.fetch(h.at(0x700)).unwrap();
    assert_eq!(after, inserted);

    let query = MenuItemInfo32 {
        cb_size: 48,
        f_mask: MIIM_ID,
        dw_type_data: h.at(0x900),
        cch: 12,
        ..MenuItemInfo32::default()
    };
    h.memory.place(h.at(0x700), &query).unwrap();
    assert_eq!(
        h.call("NtUserThunkedMenuItemInfo", &[MENU, 3, 0, 0x1004, info, 0])
            .unwrap(),
        1
    );
    let fetched: MenuItemInfo32 = h.memory.fetch(h.at(0x700)).unwrap();
    assert_eq!(fetched.cb_size, 48);
    assert_eq!(fetched.f_mask, MIIM_ID);
    assert_eq!(fetched.w_id, 77);
    assert_eq!(fetched.hbmp_checked, NarrowHandle(0x51));
    assert_eq!(fetched.hbmp_unchecked, NarrowHandle(0x52));
    assert_eq!(fetched.dw_type_data, h.at(0x900));
    assert_eq!(fetched.cch, 12);
}

#[test]
fn test_menu_item_failed_get_leaves_block() {
    let mut h = Harness::demo();
    let info = h.at(0x700).0;
    let query = MenuItemInfo32 {
        cb_size: 48,
        f_mask: MIIM_ID,
        w_id: 77,
        ..MenuItemInfo32::default()
    };
    h.memory.place(h.at(0x700), &query).unwrap();

    let ret = h
        .call("NtUserThunkedMenuItemInfo", &[MENU, 9, 0, 0x1004, info, 0])
        .unwrap();
    assert_eq!(ret, 0);
    let after: MenuItemInfo32 = h.memory.fetch(h.at(0x700)).unwrap();
    assert_eq!(after, query);
    assert_eq!(h.errors.updates(), 0);
}

#[test]
fn test_menu_item_mask_only_method_writes_nothing_back() {
    let mut h = Harness::demo();
    let info = h.at(0x700).0;
    let item = MenuItemInfo32 {
        cb_size: 48,
        f_mask: MIIM_ID,
        w_id: 5,
        ..MenuItemInfo32::default()
    };
    h.memory.place(h.at(0x700), &item).unwrap();

    // GetMenuState
    let ret = h
        .call("NtUserThunkedMenuItemInfo", &[MENU, 0, 0, 0x1005, info, 0])
        .unwrap();
    assert_eq!(ret, 1);
    let after: MenuItemInfo32 = h.memory.fetch(h.at(0x700)).unwrap();
    assert_eq!(after, item);
    assert_eq!(h.service.last_call().unwrap().name, "ThunkedMenuItemInfo");
}

#[test]
fn test_mouse_move_points() {
    let mut h = Harness::demo();
    let point = MouseMovePoint32 {
        x: 110,
        y: 70,
        time: 0,
        dw_extra_info: 0,
    };
    h.memory.place(h.at(0x700), &point).unwrap();
    let (ptin, ptout) = (h.at(0x700).0, h.at(0x800).0);

    let ret = h
        .call("NtUserGetMouseMovePointsEx", &[16, ptin, ptout, 64, 1])
        .unwrap();
    assert_eq!(ret, 2);
    let newest: MouseMovePoint32 = h.memory.fetch(h.at(0x800)).unwrap();
    let oldest: MouseMovePoint32 = h.memory.fetch(h.at(0x810)).unwrap();
    assert_eq!((newest.x, newest.time), (110, 995));
    assert_eq!((oldest.x, oldest.time), (100, 990));

    let ret = h
        .call("NtUserGetMouseMovePointsEx", &[16, ptin, ptout, 65, 1])
        .unwrap();
    assert_eq!(ret, u32::MAX);
    assert_eq!(h.errors.last_error(), ERROR_INVALID_PARAMETER);
}

#[test]
fn test_desktop_lifecycle() {
    let mut h = Harness::new(HeadlessDesktop::new());

    let desktop = h.call("NtUserOpenInputDesktop", &[0, 0, 0x1FF]).unwrap();
    assert_ne!(desktop, 0);
    assert_eq!(h.call("NtUserSetThreadDesktop", &[desktop]).unwrap(), 1);
    assert_eq!(h.call("NtUserGetThreadDesktop", &[1]).unwrap(), desktop);
    assert_eq!(h.call("NtUserCloseDesktop", &[desktop]).unwrap(), 1);
    assert_eq!(h.call("NtUserCloseDesktop", &[desktop]).unwrap(), 0);
}

#[test]
fn test_input_context_client_pointer() {
    let mut h = Harness::new(HeadlessDesktop::new());

    let ctx = h.call("NtUserCreateInputContext", &[0x0012_3400]).unwrap();
    assert_ne!(ctx, 0);
    assert_eq!(
        h.call("NtUserQueryInputContext", &[ctx, 0]).unwrap(),
        0x0012_3400
    );
    assert_eq!(h.call("NtUserDestroyInputContext", &[ctx]).unwrap(), 1);
}

#[test]
fn test_stubbed_entry_points() {
    let mut h = Harness::demo();

    assert_eq!(
        h.call("NtUserInitializeClientPfnArrays", &[0, 0, 0, 0])
            .unwrap(),
        STATUS_NOT_SUPPORTED
    );
    assert_eq!(
        h.call("NtUserMessageCall", &[0x0001_0020, 0x10, 0, 0, 0, 0, 0])
            .unwrap(),
        0
    );
    assert_eq!(h.service.call_count(), 0);
}

#[test]
fn test_calling_contract_violations() {
    let mut h = Harness::demo();

    assert_eq!(
        h.call("NtUserGetMessage", &[0, 0, 0]),
        Err(DispatchError::FrameTooShort {
            name: "NtUserGetMessage",
            expected: 4,
            provided: 3,
        })
    );
    assert_eq!(
        h.call("NtUserCreateWindowEx", &[]),
        Err(DispatchError::UnknownThunk("NtUserCreateWindowEx".to_string()))
    );
    assert_eq!(h.service.call_count(), 0);
}
