// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Display-less win32u service
//!
//! Answers every native call from a scripted [`HeadlessDesktop`] and keeps
//! the objects a client can create (desktops, window stations, hooks, input
//! contexts, accelerator tables and timers) in memory. Every call is logged
//! with the native arguments it received, so tests can check exactly what
//! crossed the width boundary.
//!
//! Buffers passed as [`NativePtr`] point into the caller's address space,
//! which this service does not map. Calls taking them are logged and report
//! success without touching the memory.

use crate::desktop::HeadlessDesktop;
use std::collections::{HashMap, HashSet};
use wow64win_shim::Win32uService;
use wow64win_shim::convert::delegated::NativeObjectAttributes;
use wow64win_shim::layout::{
    GuiThreadInfo64, MenuInfo64, MenuItemInfo64, MouseMovePoint64, Msg64, RawInputDevice64,
    RawInputDeviceList64, StructKind, TitleBarInfo, UnicodeString64,
};
use wow64win_shim::service::mouse::{GMMP_USE_DISPLAY_POINTS, GMMP_USE_HIGH_RESOLUTION_POINTS};
use wow64win_shim::service::raw_input::{RID_HEADER, RID_INPUT};
use wow64win_shim::service::wait::{WAIT_OBJECT_0, WAIT_TIMEOUT};
use wow64win_shim::width::{NativeHandle, NativePtr};
use zerocopy::IntoBytes;

const STATUS_SUCCESS: u32 = 0;
const STATUS_BUFFER_TOO_SMALL: u32 = 0xC000_0023;

const WM_QUIT: u32 = 0x0012;
const RIDEV_REMOVE: u32 = 0x0000_0001;

const CARET_BLINK_TIME: u32 = 530;
const DOUBLE_CLICK_TIME: u32 = 500;
const SYSTEM_DPI: u32 = 96;
/// en-US, as both the language and the layout id
const KEYBOARD_LAYOUT: u64 = 0x0409_0409;
/// `DPI_AWARENESS_CONTEXT_UNAWARE`
const DEFAULT_DPI_AWARENESS: u32 = 0x6010;

const FIRST_OBJECT_HANDLE: u64 = 0x0003_0000;

/// `IMC_CLIENTPTR` / `IMC_THREADID` attributes of an input context
const IMC_CLIENTPTR: u32 = 0;
const IMC_THREADID: u32 = 1;

/// One native call as the service received it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCall {
    /// Native entry point name, without the `NtUser` prefix
    pub name: &'static str,
    pub handles: Vec<NativeHandle>,
    pub pointers: Vec<NativePtr>,
    pub strings: Vec<UnicodeString64>,
    pub attributes: Option<NativeObjectAttributes>,
}

impl ServiceCall {
    fn handle(&mut self, handle: NativeHandle) -> &mut Self {
        self.handles.push(handle);
        self
    }

    fn pointer(&mut self, ptr: NativePtr) -> &mut Self {
        self.pointers.push(ptr);
        self
    }

    fn string(&mut self, string: Option<&UnicodeString64>) -> &mut Self {
        self.strings.extend(string.copied());
        self
    }

    fn attributes(&mut self, attr: Option<&NativeObjectAttributes>) -> &mut Self {
        self.attributes = attr.copied();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Desktop,
    WindowStation,
    Hook,
    WinEventHook,
    InputContext { client_ptr: u64 },
    AcceleratorTable { count: i32 },
}

/// The headless native service
#[derive(Debug)]
pub struct HeadlessWin32u {
    desktop: HeadlessDesktop,
    objects: HashMap<u64, ObjectKind>,
    next_handle: u64,
    props: HashMap<(u64, u64), NativeHandle>,
    timers: HashMap<(u64, u64), u32>,
    menu_items: HashMap<(u64, u32), MenuItemInfo64>,
    listeners: HashSet<u64>,
    calls: Vec<ServiceCall>,
    process_winsta: NativeHandle,
    thread_desktop: NativeHandle,
    dpi_awareness: u32,
    clipboard_seq: u32,
    last_wait_handles: Vec<NativeHandle>,
}

impl Default for HeadlessWin32u {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWin32u {
    /// A service over an empty desktop
    pub fn new() -> Self {
        Self::with_desktop(HeadlessDesktop::new())
    }

    pub fn with_desktop(desktop: HeadlessDesktop) -> Self {
        Self {
            desktop,
            objects: HashMap::new(),
            next_handle: FIRST_OBJECT_HANDLE,
            props: HashMap::new(),
            timers: HashMap::new(),
            menu_items: HashMap::new(),
            listeners: HashSet::new(),
            calls: Vec::new(),
            process_winsta: NativeHandle::NULL,
            thread_desktop: NativeHandle::NULL,
            dpi_awareness: DEFAULT_DPI_AWARENESS,
            clipboard_seq: 1,
            last_wait_handles: Vec::new(),
        }
    }

    pub fn desktop(&self) -> &HeadlessDesktop {
        &self.desktop
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// The most recent call
    pub fn last_call(&self) -> Option<&ServiceCall> {
        self.calls.last()
    }

    /// Handles passed to the last wait
    pub fn last_wait_handles(&self) -> &[NativeHandle] {
        &self.last_wait_handles
    }

    fn log(&mut self, name: &'static str) -> &mut ServiceCall {
        self.calls.push(ServiceCall {
            name,
            ..ServiceCall::default()
        });
        let last = self.calls.len() - 1;
        &mut self.calls[last]
    }

    fn insert_object(&mut self, kind: ObjectKind) -> NativeHandle {
        let handle = self.next_handle;
        self.next_handle += 4;
        self.objects.insert(handle, kind);
        NativeHandle(handle)
    }

    /// Remove `handle` if it names an object accepted by `accept`.
    fn remove_object(&mut self, handle: NativeHandle, accept: impl Fn(ObjectKind) -> bool) -> u32 {
        match self.objects.get(&handle.0) {
            Some(kind) if accept(*kind) => {
                self.objects.remove(&handle.0);
                1
            }
            _ => 0,
        }
    }

    fn is_object(&self, handle: NativeHandle, kind: ObjectKind) -> bool {
        self.objects.get(&handle.0) == Some(&kind)
    }

    fn is_window(&self, hwnd: NativeHandle) -> bool {
        self.desktop.window(hwnd).is_some()
    }
}

fn bool_result(value: bool) -> u32 {
    u32::from(value)
}

fn message_matches(msg: &Msg64, hwnd: NativeHandle, first: u32, last: u32) -> bool {
    let window = hwnd.is_null() || msg.hwnd == hwnd;
    let range = (first == 0 && last == 0) || (first..=last).contains(&msg.message);
    window && range
}

impl Win32uService for HeadlessWin32u {
    // Windows

    fn build_hwnd_list(
        &mut self,
        desktop: NativeHandle,
        _unk2: u32,
        _unk3: u32,
        _unk4: u32,
        thread_id: u32,
        count: u32,
        buffer: &mut [NativeHandle],
        size: &mut u32,
    ) -> u32 {
        self.log("BuildHwndList").handle(desktop);
        let windows: Vec<NativeHandle> = self
            .desktop
            .windows
            .iter()
            .filter(|window| window.parent.is_null())
            .filter(|window| thread_id == 0 || window.thread_id == thread_id)
            .map(|window| window.hwnd)
            .collect();
        let needed = u32::try_from(windows.len()).unwrap_or(u32::MAX);
        *size = needed;
        if needed > count || windows.len() > buffer.len() {
            return STATUS_BUFFER_TOO_SMALL;
        }
        buffer[..windows.len()].copy_from_slice(&windows);
        STATUS_SUCCESS
    }

    fn child_window_from_point_ex(
        &mut self,
        parent: NativeHandle,
        _x: i32,
        _y: i32,
        _flags: u32,
    ) -> NativeHandle {
        self.log("ChildWindowFromPointEx").handle(parent);
        self.desktop
            .windows
            .iter()
            .find(|window| window.parent == parent)
            .map_or(parent, |window| window.hwnd)
    }

    fn find_window_ex(
        &mut self,
        parent: NativeHandle,
        child: NativeHandle,
        class: Option<&UnicodeString64>,
        title: Option<&UnicodeString64>,
        _unk: u32,
    ) -> NativeHandle {
        self.log("FindWindowEx")
            .handle(parent)
            .handle(child)
            .string(class)
            .string(title);
        let siblings: Vec<NativeHandle> = self
            .desktop
            .windows
            .iter()
            .filter(|window| window.parent == parent)
            .map(|window| window.hwnd)
            .collect();
        let start = if child.is_null() {
            0
        } else {
            siblings
                .iter()
                .position(|hwnd| *hwnd == child)
                .map_or(siblings.len(), |pos| pos + 1)
        };
        siblings.get(start).copied().unwrap_or(NativeHandle::NULL)
    }

    fn get_ancestor(&mut self, hwnd: NativeHandle, _kind: u32) -> NativeHandle {
        self.log("GetAncestor").handle(hwnd);
        let mut current = match self.desktop.window(hwnd) {
            Some(window) => *window,
            None => return NativeHandle::NULL,
        };
        while let Some(parent) = self.desktop.window(current.parent) {
            current = *parent;
        }
        current.hwnd
    }

    fn get_class_name(
        &mut self,
        hwnd: NativeHandle,
        _real: u32,
        name: Option<&UnicodeString64>,
    ) -> u32 {
        self.log("GetClassName").handle(hwnd).string(name);
        0
    }

    fn get_foreground_window(&mut self) -> NativeHandle {
        self.log("GetForegroundWindow");
        self.desktop.foreground
    }

    fn get_gui_thread_info(&mut self, _thread_id: u32, info: &mut GuiThreadInfo64) -> u32 {
        self.log("GetGUIThreadInfo");
        if info.cb_size != StructKind::GuiThreadInfo.native_size() {
            return 0;
        }
        *info = GuiThreadInfo64 {
            cb_size: info.cb_size,
            ..self.desktop.gui_thread
        };
        1
    }

    fn get_layered_window_attributes(
        &mut self,
        hwnd: NativeHandle,
        key: NativePtr,
        alpha: NativePtr,
        flags: NativePtr,
    ) -> u32 {
        self.log("GetLayeredWindowAttributes")
            .handle(hwnd)
            .pointer(key)
            .pointer(alpha)
            .pointer(flags);
        bool_result(self.is_window(hwnd))
    }

    fn get_prop(&mut self, hwnd: NativeHandle, name: NativePtr) -> NativeHandle {
        self.log("GetProp").handle(hwnd).pointer(name);
        self.props
            .get(&(hwnd.0, name.0))
            .copied()
            .unwrap_or(NativeHandle::NULL)
    }

    fn get_title_bar_info(&mut self, hwnd: NativeHandle, info: &mut TitleBarInfo) -> u32 {
        self.log("GetTitleBarInfo").handle(hwnd);
        if info.cb_size != StructKind::TitleBarInfo.native_size() || !self.is_window(hwnd) {
            return 0;
        }
        *info = TitleBarInfo {
            cb_size: info.cb_size,
            ..self.desktop.title_bar
        };
        1
    }

    fn get_window_rgn_ex(&mut self, hwnd: NativeHandle, hrgn: NativeHandle, _unk: u32) -> u32 {
        self.log("GetWindowRgnEx").handle(hwnd).handle(hrgn);
        0
    }

    fn internal_get_window_text(
        &mut self,
        hwnd: NativeHandle,
        text: NativePtr,
        _count: i32,
    ) -> u32 {
        self.log("InternalGetWindowText").handle(hwnd).pointer(text);
        0
    }

    fn lock_window_update(&mut self, hwnd: NativeHandle) -> u32 {
        self.log("LockWindowUpdate").handle(hwnd);
        1
    }

    fn remove_prop(&mut self, hwnd: NativeHandle, name: NativePtr) -> NativeHandle {
        self.log("RemoveProp").handle(hwnd).pointer(name);
        self.props
            .remove(&(hwnd.0, name.0))
            .unwrap_or(NativeHandle::NULL)
    }

    fn set_prop(&mut self, hwnd: NativeHandle, name: NativePtr, value: NativeHandle) -> u32 {
        self.log("SetProp").handle(hwnd).pointer(name).handle(value);
        if !self.is_window(hwnd) {
            return 0;
        }
        self.props.insert((hwnd.0, name.0), value);
        1
    }

    fn window_from_dc(&mut self, hdc: NativeHandle) -> NativeHandle {
        self.log("WindowFromDC").handle(hdc);
        NativeHandle::NULL
    }

    // Messages and timers

    fn call_msg_filter(&mut self, msg: Option<&mut Msg64>, _code: i32) -> u32 {
        let hwnd = msg.as_ref().map_or(NativeHandle::NULL, |msg| msg.hwnd);
        self.log("CallMsgFilter").handle(hwnd);
        0
    }

    fn dispatch_message(&mut self, msg: Option<&Msg64>) -> u64 {
        let hwnd = msg.map_or(NativeHandle::NULL, |msg| msg.hwnd);
        self.log("DispatchMessage").handle(hwnd);
        0
    }

    fn get_message(&mut self, msg: &mut Msg64, hwnd: NativeHandle, first: u32, last: u32) -> u32 {
        self.log("GetMessage").handle(hwnd);
        let found = self
            .desktop
            .messages
            .iter()
            .position(|queued| message_matches(queued, hwnd, first, last))
            .and_then(|pos| self.desktop.messages.remove(pos));
        *msg = found.unwrap_or(Msg64 {
            message: WM_QUIT,
            ..Msg64::default()
        });
        bool_result(msg.message != WM_QUIT)
    }

    fn kill_timer(&mut self, hwnd: NativeHandle, id: u64) -> u32 {
        self.log("KillTimer").handle(hwnd);
        bool_result(self.timers.remove(&(hwnd.0, id)).is_some())
    }

    fn msg_wait_for_multiple_objects_ex(
        &mut self,
        handles: &[NativeHandle],
        _timeout: u32,
        _mask: u32,
        _flags: u32,
    ) -> u32 {
        let call = self.log("MsgWaitForMultipleObjectsEx");
        for handle in handles {
            call.handle(*handle);
        }
        self.last_wait_handles = handles.to_vec();
        if self.desktop.messages.is_empty() {
            WAIT_TIMEOUT
        } else {
            WAIT_OBJECT_0 + u32::try_from(handles.len()).unwrap_or(u32::MAX)
        }
    }

    fn set_system_timer(&mut self, hwnd: NativeHandle, id: u64, timeout: u32) -> u64 {
        self.log("SetSystemTimer").handle(hwnd);
        self.timers.insert((hwnd.0, id), timeout);
        id
    }

    fn set_timer(
        &mut self,
        hwnd: NativeHandle,
        id: u64,
        timeout: u32,
        proc: NativePtr,
        _tolerance: u32,
    ) -> u64 {
        self.log("SetTimer").handle(hwnd).pointer(proc);
        self.timers.insert((hwnd.0, id), timeout);
        id
    }

    // Menus

    fn check_menu_item(&mut self, menu: NativeHandle, _id: u32, _flags: u32) -> u32 {
        self.log("CheckMenuItem").handle(menu);
        0
    }

    fn delete_menu(&mut self, menu: NativeHandle, id: u32, _flags: u32) -> u32 {
        self.log("DeleteMenu").handle(menu);
        bool_result(self.menu_items.remove(&(menu.0, id)).is_some())
    }

    fn end_menu(&mut self) -> u32 {
        self.log("EndMenu");
        1
    }

    fn get_menu_item_rect(
        &mut self,
        hwnd: NativeHandle,
        menu: NativeHandle,
        _item: u32,
        rect: NativePtr,
    ) -> u32 {
        self.log("GetMenuItemRect")
            .handle(hwnd)
            .handle(menu)
            .pointer(rect);
        0
    }

    fn menu_item_from_point(
        &mut self,
        hwnd: NativeHandle,
        menu: NativeHandle,
        _x: i32,
        _y: i32,
    ) -> i32 {
        self.log("MenuItemFromPoint").handle(hwnd).handle(menu);
        -1
    }

    fn remove_menu(&mut self, menu: NativeHandle, id: u32, _flags: u32) -> u32 {
        self.log("RemoveMenu").handle(menu);
        bool_result(self.menu_items.remove(&(menu.0, id)).is_some())
    }

    fn set_menu_context_help_id(&mut self, menu: NativeHandle, _id: u32) -> u32 {
        self.log("SetMenuContextHelpId").handle(menu);
        1
    }

    fn set_menu_default_item(&mut self, menu: NativeHandle, _item: u32, _by_pos: u32) -> u32 {
        self.log("SetMenuDefaultItem").handle(menu);
        1
    }

    fn thunked_menu_info(&mut self, menu: NativeHandle, info: Option<&MenuInfo64>) -> u32 {
        self.log("ThunkedMenuInfo").handle(menu);
        bool_result(info.is_some())
    }

    fn thunked_menu_item_info(
        &mut self,
        menu: NativeHandle,
        pos: u32,
        _flags: u32,
        method: u32,
        info: Option<&mut MenuItemInfo64>,
        text: Option<&UnicodeString64>,
    ) -> u32 {
        self.log("ThunkedMenuItemInfo").handle(menu).string(text);
        let Some(info) = info else {
            return 0;
        };
        match method {
            0 | 1 => {
                self.menu_items.insert((menu.0, pos), *info);
                1
            }
            0x1003 | 0x1004 => match self.menu_items.get(&(menu.0, pos)) {
                Some(stored) => {
                    *info = MenuItemInfo64 {
                        cb_size: info.cb_size,
                        f_mask: info.f_mask,
                        dw_type_data: info.dw_type_data,
                        cch: info.cch,
                        ..*stored
                    };
                    1
                }
                None => 0,
            },
            _ => 1,
        }
    }

    fn track_popup_menu_ex(
        &mut self,
        menu: NativeHandle,
        _flags: u32,
        _x: i32,
        _y: i32,
        hwnd: NativeHandle,
        params: NativePtr,
    ) -> u32 {
        self.log("TrackPopupMenuEx")
            .handle(menu)
            .handle(hwnd)
            .pointer(params);
        0
    }

    // Keyboard

    fn attach_thread_input(&mut self, _from: u32, _to: u32, _attach: u32) -> u32 {
        self.log("AttachThreadInput");
        1
    }

    fn get_key_state(&mut self, vkey: i32) -> i16 {
        self.log("GetKeyState");
        self.desktop.key_state(vkey)
    }

    fn get_keyboard_layout(&mut self, _thread_id: u32) -> NativeHandle {
        self.log("GetKeyboardLayout");
        NativeHandle(KEYBOARD_LAYOUT)
    }

    fn get_keyboard_layout_name(&mut self, name: NativePtr) -> u32 {
        self.log("GetKeyboardLayoutName").pointer(name);
        1
    }

    fn get_keyboard_state(&mut self, state: NativePtr) -> u32 {
        self.log("GetKeyboardState").pointer(state);
        1
    }

    fn set_keyboard_state(&mut self, state: NativePtr) -> u32 {
        self.log("SetKeyboardState").pointer(state);
        1
    }

    // Raw input

    fn get_raw_input_buffer(
        &mut self,
        data: NativePtr,
        data_size: NativePtr,
        header_size: u32,
    ) -> u32 {
        self.log("GetRawInputBuffer")
            .pointer(data)
            .pointer(data_size);
        if header_size == StructKind::RawInputHeader.native_size() {
            0
        } else {
            u32::MAX
        }
    }

    fn get_raw_input_data(
        &mut self,
        handle: NativeHandle,
        command: u32,
        data: Option<&mut [u8]>,
        data_size: &mut u32,
        header_size: u32,
    ) -> u32 {
        self.log("GetRawInputData").handle(handle);
        let native_header = StructKind::RawInputHeader.native_size();
        if header_size != native_header {
            return u32::MAX;
        }
        let Some(packet) = self.desktop.raw_input.iter().find(|p| p.handle == handle) else {
            return u32::MAX;
        };

        let total = match command {
            RID_INPUT => packet.native_size(),
            RID_HEADER => native_header,
            _ => return u32::MAX,
        };
        let Some(data) = data else {
            *data_size = total;
            return 0;
        };
        let len = total as usize;
        if *data_size < total || data.len() < len {
            return u32::MAX;
        }
        let header = packet.header.as_bytes();
        data[..header.len()].copy_from_slice(header);
        if command == RID_INPUT {
            data[header.len()..len].copy_from_slice(&packet.body);
        }
        total
    }

    fn get_raw_input_device_info(
        &mut self,
        handle: NativeHandle,
        _command: u32,
        data: NativePtr,
        data_size: NativePtr,
    ) -> u32 {
        self.log("GetRawInputDeviceInfo")
            .handle(handle)
            .pointer(data)
            .pointer(data_size);
        if self.desktop.devices.iter().any(|d| d.h_device == handle) {
            0
        } else {
            u32::MAX
        }
    }

    fn get_raw_input_device_list(
        &mut self,
        devices: Option<&mut [RawInputDeviceList64]>,
        count: &mut u32,
        size: u32,
    ) -> u32 {
        self.log("GetRawInputDeviceList");
        if size != StructKind::RawInputDeviceList.native_size() {
            return u32::MAX;
        }
        copy_device_array(&self.desktop.devices, devices, count)
    }

    fn get_registered_raw_input_devices(
        &mut self,
        devices: Option<&mut [RawInputDevice64]>,
        count: &mut u32,
        size: u32,
    ) -> u32 {
        self.log("GetRegisteredRawInputDevices");
        if size != StructKind::RawInputDevice.native_size() {
            return u32::MAX;
        }
        copy_device_array(&self.desktop.registered, devices, count)
    }

    fn register_raw_input_devices(&mut self, devices: &[RawInputDevice64], size: u32) -> u32 {
        let call = self.log("RegisterRawInputDevices");
        for device in devices {
            call.handle(device.hwnd_target);
        }
        if size != StructKind::RawInputDevice.native_size() {
            return 0;
        }
        for device in devices {
            let registered = &mut self.desktop.registered;
            registered.retain(|existing| {
                (existing.us_usage_page, existing.us_usage)
                    != (device.us_usage_page, device.us_usage)
            });
            if device.dw_flags & RIDEV_REMOVE == 0 {
                registered.push(*device);
            }
        }
        1
    }

    // Cursor and caret

    fn find_existing_cursor_icon(
        &mut self,
        module: Option<&UnicodeString64>,
        res_name: Option<&UnicodeString64>,
        desc: NativePtr,
    ) -> NativeHandle {
        self.log("FindExistingCursorIcon")
            .string(module)
            .string(res_name)
            .pointer(desc);
        NativeHandle::NULL
    }

    fn get_caret_blink_time(&mut self) -> u32 {
        self.log("GetCaretBlinkTime");
        CARET_BLINK_TIME
    }

    fn get_caret_pos(&mut self, pt: NativePtr) -> u32 {
        self.log("GetCaretPos").pointer(pt);
        1
    }

    fn get_cursor(&mut self) -> NativeHandle {
        self.log("GetCursor");
        self.desktop.cursor
    }

    fn get_cursor_frame_info(
        &mut self,
        cursor: NativeHandle,
        _step: u32,
        rate_jiffies: NativePtr,
        num_steps: NativePtr,
    ) -> NativeHandle {
        self.log("GetCursorFrameInfo")
            .handle(cursor)
            .pointer(rate_jiffies)
            .pointer(num_steps);
        cursor
    }

    fn get_double_click_time(&mut self) -> u32 {
        self.log("GetDoubleClickTime");
        DOUBLE_CLICK_TIME
    }

    fn get_icon_size(
        &mut self,
        icon: NativeHandle,
        _step: u32,
        width: NativePtr,
        height: NativePtr,
    ) -> u32 {
        self.log("GetIconSize")
            .handle(icon)
            .pointer(width)
            .pointer(height);
        bool_result(!icon.is_null())
    }

    fn get_mouse_move_points_ex(
        &mut self,
        size: u32,
        point: &MouseMovePoint64,
        out: &mut [MouseMovePoint64],
        resolution: u32,
    ) -> i32 {
        self.log("GetMouseMovePointsEx");
        let known_resolution = matches!(
            resolution,
            GMMP_USE_DISPLAY_POINTS | GMMP_USE_HIGH_RESOLUTION_POINTS
        );
        if size != StructKind::MouseMovePoint.native_size() || !known_resolution {
            return -1;
        }
        let history = &self.desktop.mouse_history;
        let Some(start) = history.iter().position(|entry| {
            entry.x == point.x && entry.y == point.y && (point.time == 0 || entry.time == point.time)
        }) else {
            return -1;
        };
        let copied = (history.len() - start).min(out.len());
        out[..copied].copy_from_slice(&history[start..start + copied]);
        i32::try_from(copied).unwrap_or(-1)
    }

    // Input contexts

    fn associate_input_context(
        &mut self,
        hwnd: NativeHandle,
        ctx: NativeHandle,
        _flags: u32,
    ) -> u32 {
        self.log("AssociateInputContext").handle(hwnd).handle(ctx);
        0
    }

    fn create_input_context(&mut self, client_ptr: u64) -> NativeHandle {
        self.log("CreateInputContext");
        self.insert_object(ObjectKind::InputContext { client_ptr })
    }

    fn destroy_input_context(&mut self, ctx: NativeHandle) -> u32 {
        self.log("DestroyInputContext").handle(ctx);
        self.remove_object(ctx, |kind| matches!(kind, ObjectKind::InputContext { .. }))
    }

    fn query_input_context(&mut self, ctx: NativeHandle, attr: u32) -> u64 {
        self.log("QueryInputContext").handle(ctx);
        match (self.objects.get(&ctx.0), attr) {
            (Some(ObjectKind::InputContext { client_ptr }), IMC_CLIENTPTR) => *client_ptr,
            (Some(ObjectKind::InputContext { .. }), IMC_THREADID) => 1,
            _ => 0,
        }
    }

    fn update_input_context(&mut self, ctx: NativeHandle, attr: u32, value: u64) -> u32 {
        self.log("UpdateInputContext").handle(ctx);
        match self.objects.get_mut(&ctx.0) {
            Some(ObjectKind::InputContext { client_ptr }) if attr == IMC_CLIENTPTR => {
                *client_ptr = value;
                1
            }
            _ => 0,
        }
    }

    // Clipboard and atoms

    fn add_clipboard_format_listener(&mut self, hwnd: NativeHandle) -> u32 {
        self.log("AddClipboardFormatListener").handle(hwnd);
        bool_result(self.is_window(hwnd) && self.listeners.insert(hwnd.0))
    }

    fn get_atom_name(&mut self, _atom: u32, name: Option<&UnicodeString64>) -> u32 {
        self.log("GetAtomName").string(name);
        0
    }

    fn get_clipboard_format_name(&mut self, _format: u32, buffer: NativePtr, _max_len: i32) -> i32 {
        self.log("GetClipboardFormatName").pointer(buffer);
        0
    }

    fn get_clipboard_owner(&mut self) -> NativeHandle {
        self.log("GetClipboardOwner");
        NativeHandle::NULL
    }

    fn get_clipboard_sequence_number(&mut self) -> u32 {
        self.log("GetClipboardSequenceNumber");
        self.clipboard_seq
    }

    fn get_clipboard_viewer(&mut self) -> NativeHandle {
        self.log("GetClipboardViewer");
        NativeHandle::NULL
    }

    fn get_open_clipboard_window(&mut self) -> NativeHandle {
        self.log("GetOpenClipboardWindow");
        NativeHandle::NULL
    }

    fn remove_clipboard_format_listener(&mut self, hwnd: NativeHandle) -> u32 {
        self.log("RemoveClipboardFormatListener").handle(hwnd);
        bool_result(self.listeners.remove(&hwnd.0))
    }

    // Desktops and window stations

    fn close_desktop(&mut self, desktop: NativeHandle) -> u32 {
        self.log("CloseDesktop").handle(desktop);
        self.remove_object(desktop, |kind| kind == ObjectKind::Desktop)
    }

    fn close_window_station(&mut self, winsta: NativeHandle) -> u32 {
        self.log("CloseWindowStation").handle(winsta);
        self.remove_object(winsta, |kind| kind == ObjectKind::WindowStation)
    }

    fn create_desktop_ex(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        device: Option<&UnicodeString64>,
        devmode: NativePtr,
        _flags: u32,
        _access: u32,
        _heap_size: u32,
    ) -> NativeHandle {
        self.log("CreateDesktopEx")
            .attributes(attr)
            .string(device)
            .pointer(devmode);
        if attr.is_none_or(|attr| attr.length == 0) {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::Desktop)
    }

    fn create_window_station(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        _access: u32,
        _arg3: u32,
        _arg4: u32,
        _arg5: u32,
        _arg6: u32,
        _arg7: u32,
    ) -> NativeHandle {
        self.log("CreateWindowStation").attributes(attr);
        if attr.is_none_or(|attr| attr.length == 0) {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::WindowStation)
    }

    fn get_object_information(
        &mut self,
        handle: NativeHandle,
        _index: i32,
        info: NativePtr,
        _len: u32,
        needed: NativePtr,
    ) -> u32 {
        self.log("GetObjectInformation")
            .handle(handle)
            .pointer(info)
            .pointer(needed);
        bool_result(self.objects.contains_key(&handle.0))
    }

    fn get_process_window_station(&mut self) -> NativeHandle {
        self.log("GetProcessWindowStation");
        self.process_winsta
    }

    fn get_thread_desktop(&mut self, _thread_id: u32) -> NativeHandle {
        self.log("GetThreadDesktop");
        self.thread_desktop
    }

    fn open_desktop(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        _flags: u32,
        _access: u32,
    ) -> NativeHandle {
        self.log("OpenDesktop").attributes(attr);
        if attr.is_none_or(|attr| attr.length == 0) {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::Desktop)
    }

    fn open_input_desktop(&mut self, _flags: u32, _inherit: u32, _access: u32) -> NativeHandle {
        self.log("OpenInputDesktop");
        self.insert_object(ObjectKind::Desktop)
    }

    fn open_window_station(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        _access: u32,
    ) -> NativeHandle {
        self.log("OpenWindowStation").attributes(attr);
        if attr.is_none_or(|attr| attr.length == 0) {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::WindowStation)
    }

    fn set_object_information(
        &mut self,
        handle: NativeHandle,
        _index: i32,
        info: NativePtr,
        _len: u32,
    ) -> u32 {
        self.log("SetObjectInformation")
            .handle(handle)
            .pointer(info);
        bool_result(self.objects.contains_key(&handle.0))
    }

    fn set_process_window_station(&mut self, winsta: NativeHandle) -> u32 {
        self.log("SetProcessWindowStation").handle(winsta);
        if !self.is_object(winsta, ObjectKind::WindowStation) {
            return 0;
        }
        self.process_winsta = winsta;
        1
    }

    fn set_thread_desktop(&mut self, desktop: NativeHandle) -> u32 {
        self.log("SetThreadDesktop").handle(desktop);
        if !self.is_object(desktop, ObjectKind::Desktop) {
            return 0;
        }
        self.thread_desktop = desktop;
        1
    }

    // Hooks and events

    fn notify_win_event(&mut self, _event: u32, hwnd: NativeHandle, _object_id: i32, _child_id: i32) {
        self.log("NotifyWinEvent").handle(hwnd);
    }

    fn set_win_event_hook(
        &mut self,
        _event_min: u32,
        _event_max: u32,
        inst: NativeHandle,
        module: Option<&UnicodeString64>,
        proc: NativePtr,
        _pid: u32,
        _tid: u32,
        _flags: u32,
    ) -> NativeHandle {
        self.log("SetWinEventHook")
            .handle(inst)
            .string(module)
            .pointer(proc);
        if proc.is_null() {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::WinEventHook)
    }

    fn set_windows_hook_ex(
        &mut self,
        inst: NativeHandle,
        module: Option<&UnicodeString64>,
        _tid: u32,
        _id: i32,
        proc: NativePtr,
        _ansi: u32,
    ) -> NativeHandle {
        self.log("SetWindowsHookEx")
            .handle(inst)
            .string(module)
            .pointer(proc);
        if proc.is_null() {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::Hook)
    }

    fn unhook_win_event(&mut self, hook: NativeHandle) -> u32 {
        self.log("UnhookWinEvent").handle(hook);
        self.remove_object(hook, |kind| kind == ObjectKind::WinEventHook)
    }

    fn unhook_windows_hook_ex(&mut self, hook: NativeHandle) -> u32 {
        self.log("UnhookWindowsHookEx").handle(hook);
        self.remove_object(hook, |kind| kind == ObjectKind::Hook)
    }

    // DPI

    fn get_dpi_for_monitor(
        &mut self,
        monitor: NativeHandle,
        _kind: u32,
        x: NativePtr,
        y: NativePtr,
    ) -> u32 {
        self.log("GetDpiForMonitor")
            .handle(monitor)
            .pointer(x)
            .pointer(y);
        1
    }

    fn get_process_dpi_awareness_context(&mut self, process: NativeHandle) -> u32 {
        self.log("GetProcessDpiAwarenessContext").handle(process);
        self.dpi_awareness
    }

    fn get_system_dpi_for_process(&mut self, process: NativeHandle) -> u32 {
        self.log("GetSystemDpiForProcess").handle(process);
        SYSTEM_DPI
    }

    fn set_process_dpi_awareness_context(&mut self, awareness: u32, _unknown: u32) -> u32 {
        self.log("SetProcessDpiAwarenessContext");
        self.dpi_awareness = awareness;
        1
    }

    // Accelerators

    fn copy_accelerator_table(&mut self, src: NativeHandle, dst: NativePtr, count: i32) -> i32 {
        self.log("CopyAcceleratorTable").handle(src).pointer(dst);
        match self.objects.get(&src.0) {
            Some(ObjectKind::AcceleratorTable { count: entries }) if dst.is_null() => *entries,
            Some(ObjectKind::AcceleratorTable { count: entries }) => (*entries).min(count),
            _ => 0,
        }
    }

    fn create_accelerator_table(&mut self, table: NativePtr, count: i32) -> NativeHandle {
        self.log("CreateAcceleratorTable").pointer(table);
        if table.is_null() || count <= 0 {
            return NativeHandle::NULL;
        }
        self.insert_object(ObjectKind::AcceleratorTable { count })
    }

    fn destroy_accelerator_table(&mut self, table: NativeHandle) -> u32 {
        self.log("DestroyAcceleratorTable").handle(table);
        self.remove_object(table, |kind| {
            matches!(kind, ObjectKind::AcceleratorTable { .. })
        })
    }
}

/// Two-phase device array copy shared by the device list and the registered
/// device list.
fn copy_device_array<T: Copy>(source: &[T], dest: Option<&mut [T]>, count: &mut u32) -> u32 {
    let available = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let Some(dest) = dest else {
        *count = available;
        return 0;
    };
    if *count < available || dest.len() < source.len() {
        *count = available;
        return u32::MAX;
    }
    dest[..source.len()].copy_from_slice(source);
    available
}
