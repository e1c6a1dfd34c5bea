// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Native win32u interface
//!
//! One method per native service call, taking native-width values. Buffers
//! whose layout does not depend on pointer width are passed as [`NativePtr`]
//! into the shared address space; everything width-dependent arrives already
//! transcoded.
//!
//! Results are the service's own: handles, counts, booleans or status codes.
//! Failures are reported through those results, never through `Result`.

use crate::convert::delegated::NativeObjectAttributes;
use crate::layout::{
    GuiThreadInfo64, MenuInfo64, MenuItemInfo64, MouseMovePoint64, Msg64, RawInputDevice64,
    RawInputDeviceList64, TitleBarInfo, UnicodeString64,
};
use crate::width::{NativeHandle, NativePtr};

/// Native win32u service
///
/// Implemented by the platform layer (`wow64win_platform_headless` provides a
/// display-less implementation).
pub trait Win32uService {
    // Windows

    /// NtUserBuildHwndList - Enumerate windows into `buffer`
    ///
    /// `size` receives the number of handles written, or the number required
    /// if `buffer` is too small.
    fn build_hwnd_list(
        &mut self,
        desktop: NativeHandle,
        unk2: u32,
        unk3: u32,
        unk4: u32,
        thread_id: u32,
        count: u32,
        buffer: &mut [NativeHandle],
        size: &mut u32,
    ) -> u32;

    /// NtUserChildWindowFromPointEx - Child of `parent` containing a point
    fn child_window_from_point_ex(
        &mut self,
        parent: NativeHandle,
        x: i32,
        y: i32,
        flags: u32,
    ) -> NativeHandle;

    /// NtUserFindWindowEx - Find a window by class and title
    fn find_window_ex(
        &mut self,
        parent: NativeHandle,
        child: NativeHandle,
        class: Option<&UnicodeString64>,
        title: Option<&UnicodeString64>,
        unk: u32,
    ) -> NativeHandle;

    /// NtUserGetAncestor - Parent, root or owner of a window
    fn get_ancestor(&mut self, hwnd: NativeHandle, kind: u32) -> NativeHandle;

    /// NtUserGetClassName - Class name of a window into the string's buffer
    fn get_class_name(
        &mut self,
        hwnd: NativeHandle,
        real: u32,
        name: Option<&UnicodeString64>,
    ) -> u32;

    /// NtUserGetForegroundWindow
    fn get_foreground_window(&mut self) -> NativeHandle;

    /// NtUserGetGUIThreadInfo - Active, focus, capture and caret state of a thread
    fn get_gui_thread_info(&mut self, thread_id: u32, info: &mut GuiThreadInfo64) -> u32;

    /// NtUserGetLayeredWindowAttributes
    fn get_layered_window_attributes(
        &mut self,
        hwnd: NativeHandle,
        key: NativePtr,
        alpha: NativePtr,
        flags: NativePtr,
    ) -> u32;

    /// NtUserGetProp - Window property by atom or name
    fn get_prop(&mut self, hwnd: NativeHandle, name: NativePtr) -> NativeHandle;

    /// NtUserGetTitleBarInfo
    fn get_title_bar_info(&mut self, hwnd: NativeHandle, info: &mut TitleBarInfo) -> u32;

    /// NtUserGetWindowRgnEx
    fn get_window_rgn_ex(&mut self, hwnd: NativeHandle, hrgn: NativeHandle, unk: u32) -> u32;

    /// NtUserInternalGetWindowText
    fn internal_get_window_text(&mut self, hwnd: NativeHandle, text: NativePtr, count: i32)
    -> u32;

    /// NtUserLockWindowUpdate
    fn lock_window_update(&mut self, hwnd: NativeHandle) -> u32;

    /// NtUserRemoveProp - Remove a window property, returning its value
    fn remove_prop(&mut self, hwnd: NativeHandle, name: NativePtr) -> NativeHandle;

    /// NtUserSetProp
    fn set_prop(&mut self, hwnd: NativeHandle, name: NativePtr, value: NativeHandle) -> u32;

    /// NtUserWindowFromDC
    fn window_from_dc(&mut self, hdc: NativeHandle) -> NativeHandle;

    // Messages and timers

    /// NtUserCallMsgFilter - Run message filter hooks
    ///
    /// Hooks may modify the message in place.
    fn call_msg_filter(&mut self, msg: Option<&mut Msg64>, code: i32) -> u32;

    /// NtUserDispatchMessage - Returns the window procedure's result
    fn dispatch_message(&mut self, msg: Option<&Msg64>) -> u64;

    /// NtUserGetMessage - Retrieve the next message
    ///
    /// Returns 0 for `WM_QUIT`, `~0` on error.
    fn get_message(
        &mut self,
        msg: &mut Msg64,
        hwnd: NativeHandle,
        first: u32,
        last: u32,
    ) -> u32;

    /// NtUserKillTimer
    fn kill_timer(&mut self, hwnd: NativeHandle, id: u64) -> u32;

    /// NtUserMsgWaitForMultipleObjectsEx - Wait for handles or queued input
    fn msg_wait_for_multiple_objects_ex(
        &mut self,
        handles: &[NativeHandle],
        timeout: u32,
        mask: u32,
        flags: u32,
    ) -> u32;

    /// NtUserSetSystemTimer - Returns the timer id, 0 on failure
    fn set_system_timer(&mut self, hwnd: NativeHandle, id: u64, timeout: u32) -> u64;

    /// NtUserSetTimer - Returns the timer id, 0 on failure
    fn set_timer(
        &mut self,
        hwnd: NativeHandle,
        id: u64,
        timeout: u32,
        proc: NativePtr,
        tolerance: u32,
    ) -> u64;

    // Menus

    /// NtUserCheckMenuItem - Returns the previous check state
    fn check_menu_item(&mut self, menu: NativeHandle, id: u32, flags: u32) -> u32;

    /// NtUserDeleteMenu
    fn delete_menu(&mut self, menu: NativeHandle, id: u32, flags: u32) -> u32;

    /// NtUserEndMenu
    fn end_menu(&mut self) -> u32;

    /// NtUserGetMenuItemRect
    fn get_menu_item_rect(
        &mut self,
        hwnd: NativeHandle,
        menu: NativeHandle,
        item: u32,
        rect: NativePtr,
    ) -> u32;

    /// NtUserMenuItemFromPoint - Item index at a point, -1 if none
    fn menu_item_from_point(&mut self, hwnd: NativeHandle, menu: NativeHandle, x: i32, y: i32)
    -> i32;

    /// NtUserRemoveMenu
    fn remove_menu(&mut self, menu: NativeHandle, id: u32, flags: u32) -> u32;

    /// NtUserSetMenuContextHelpId
    fn set_menu_context_help_id(&mut self, menu: NativeHandle, id: u32) -> u32;

    /// NtUserSetMenuDefaultItem
    fn set_menu_default_item(&mut self, menu: NativeHandle, item: u32, by_pos: u32) -> u32;

    /// NtUserThunkedMenuInfo - Set menu information
    fn thunked_menu_info(&mut self, menu: NativeHandle, info: Option<&MenuInfo64>) -> u32;

    /// NtUserThunkedMenuItemInfo - Menu item operation selected by `method`
    ///
    /// Query methods fill `info`.
    fn thunked_menu_item_info(
        &mut self,
        menu: NativeHandle,
        pos: u32,
        flags: u32,
        method: u32,
        info: Option<&mut MenuItemInfo64>,
        text: Option<&UnicodeString64>,
    ) -> u32;

    /// NtUserTrackPopupMenuEx
    fn track_popup_menu_ex(
        &mut self,
        menu: NativeHandle,
        flags: u32,
        x: i32,
        y: i32,
        hwnd: NativeHandle,
        params: NativePtr,
    ) -> u32;

    // Keyboard

    /// NtUserAttachThreadInput
    fn attach_thread_input(&mut self, from: u32, to: u32, attach: u32) -> u32;

    /// NtUserGetKeyState
    fn get_key_state(&mut self, vkey: i32) -> i16;

    /// NtUserGetKeyboardLayout
    fn get_keyboard_layout(&mut self, thread_id: u32) -> NativeHandle;

    /// NtUserGetKeyboardLayoutName - Writes KL_NAMELENGTH characters
    fn get_keyboard_layout_name(&mut self, name: NativePtr) -> u32;

    /// NtUserGetKeyboardState - Writes 256 key states
    fn get_keyboard_state(&mut self, state: NativePtr) -> u32;

    /// NtUserSetKeyboardState
    fn set_keyboard_state(&mut self, state: NativePtr) -> u32;

    // Raw input

    /// NtUserGetRawInputBuffer - Batch read of raw input
    ///
    /// The batch is returned in the caller's own layout.
    fn get_raw_input_buffer(&mut self, data: NativePtr, data_size: NativePtr, header_size: u32)
    -> u32;

    /// NtUserGetRawInputData - Read one raw input record or its header
    ///
    /// Without `data`, `data_size` receives the required size. Returns the
    /// bytes written, or `~0` on failure.
    fn get_raw_input_data(
        &mut self,
        handle: NativeHandle,
        command: u32,
        data: Option<&mut [u8]>,
        data_size: &mut u32,
        header_size: u32,
    ) -> u32;

    /// NtUserGetRawInputDeviceInfo
    fn get_raw_input_device_info(
        &mut self,
        handle: NativeHandle,
        command: u32,
        data: NativePtr,
        data_size: NativePtr,
    ) -> u32;

    /// NtUserGetRawInputDeviceList - Enumerate attached raw input devices
    ///
    /// Returns the number written, or `~0` with `count` set to the number
    /// required.
    fn get_raw_input_device_list(
        &mut self,
        devices: Option<&mut [RawInputDeviceList64]>,
        count: &mut u32,
        size: u32,
    ) -> u32;

    /// NtUserGetRegisteredRawInputDevices - Same contract as the device list
    fn get_registered_raw_input_devices(
        &mut self,
        devices: Option<&mut [RawInputDevice64]>,
        count: &mut u32,
        size: u32,
    ) -> u32;

    /// NtUserRegisterRawInputDevices
    fn register_raw_input_devices(&mut self, devices: &[RawInputDevice64], size: u32) -> u32;

    // Cursor and caret

    /// NtUserFindExistingCursorIcon
    fn find_existing_cursor_icon(
        &mut self,
        module: Option<&UnicodeString64>,
        res_name: Option<&UnicodeString64>,
        desc: NativePtr,
    ) -> NativeHandle;

    /// NtUserGetCaretBlinkTime
    fn get_caret_blink_time(&mut self) -> u32;

    /// NtUserGetCaretPos
    fn get_caret_pos(&mut self, pt: NativePtr) -> u32;

    /// NtUserGetCursor
    fn get_cursor(&mut self) -> NativeHandle;

    /// NtUserGetCursorFrameInfo - Frame of an animated cursor
    fn get_cursor_frame_info(
        &mut self,
        cursor: NativeHandle,
        step: u32,
        rate_jiffies: NativePtr,
        num_steps: NativePtr,
    ) -> NativeHandle;

    /// NtUserGetDoubleClickTime
    fn get_double_click_time(&mut self) -> u32;

    /// NtUserGetIconSize
    fn get_icon_size(
        &mut self,
        icon: NativeHandle,
        step: u32,
        width: NativePtr,
        height: NativePtr,
    ) -> u32;

    /// NtUserGetMouseMovePointsEx - Mouse history preceding `point`
    ///
    /// Returns the number of points written, -1 on failure.
    fn get_mouse_move_points_ex(
        &mut self,
        size: u32,
        point: &MouseMovePoint64,
        out: &mut [MouseMovePoint64],
        resolution: u32,
    ) -> i32;

    // Input contexts

    /// NtUserAssociateInputContext
    fn associate_input_context(
        &mut self,
        hwnd: NativeHandle,
        ctx: NativeHandle,
        flags: u32,
    ) -> u32;

    /// NtUserCreateInputContext
    fn create_input_context(&mut self, client_ptr: u64) -> NativeHandle;

    /// NtUserDestroyInputContext
    fn destroy_input_context(&mut self, ctx: NativeHandle) -> u32;

    /// NtUserQueryInputContext
    fn query_input_context(&mut self, ctx: NativeHandle, attr: u32) -> u64;

    /// NtUserUpdateInputContext
    fn update_input_context(&mut self, ctx: NativeHandle, attr: u32, value: u64) -> u32;

    // Clipboard and atoms

    /// NtUserAddClipboardFormatListener
    fn add_clipboard_format_listener(&mut self, hwnd: NativeHandle) -> u32;

    /// NtUserGetAtomName
    fn get_atom_name(&mut self, atom: u32, name: Option<&UnicodeString64>) -> u32;

    /// NtUserGetClipboardFormatName
    fn get_clipboard_format_name(&mut self, format: u32, buffer: NativePtr, max_len: i32) -> i32;

    /// NtUserGetClipboardOwner
    fn get_clipboard_owner(&mut self) -> NativeHandle;

    /// NtUserGetClipboardSequenceNumber
    fn get_clipboard_sequence_number(&mut self) -> u32;

    /// NtUserGetClipboardViewer
    fn get_clipboard_viewer(&mut self) -> NativeHandle;

    /// NtUserGetOpenClipboardWindow
    fn get_open_clipboard_window(&mut self) -> NativeHandle;

    /// NtUserRemoveClipboardFormatListener
    fn remove_clipboard_format_listener(&mut self, hwnd: NativeHandle) -> u32;

    // Desktops and window stations

    /// NtUserCloseDesktop
    fn close_desktop(&mut self, desktop: NativeHandle) -> u32;

    /// NtUserCloseWindowStation
    fn close_window_station(&mut self, winsta: NativeHandle) -> u32;

    /// NtUserCreateDesktopEx
    fn create_desktop_ex(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        device: Option<&UnicodeString64>,
        devmode: NativePtr,
        flags: u32,
        access: u32,
        heap_size: u32,
    ) -> NativeHandle;

    /// NtUserCreateWindowStation
    fn create_window_station(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        access: u32,
        arg3: u32,
        arg4: u32,
        arg5: u32,
        arg6: u32,
        arg7: u32,
    ) -> NativeHandle;

    /// NtUserGetObjectInformation
    fn get_object_information(
        &mut self,
        handle: NativeHandle,
        index: i32,
        info: NativePtr,
        len: u32,
        needed: NativePtr,
    ) -> u32;

    /// NtUserGetProcessWindowStation
    fn get_process_window_station(&mut self) -> NativeHandle;

    /// NtUserGetThreadDesktop
    fn get_thread_desktop(&mut self, thread_id: u32) -> NativeHandle;

    /// NtUserOpenDesktop
    fn open_desktop(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        flags: u32,
        access: u32,
    ) -> NativeHandle;

    /// NtUserOpenInputDesktop
    fn open_input_desktop(&mut self, flags: u32, inherit: u32, access: u32) -> NativeHandle;

    /// NtUserOpenWindowStation
    fn open_window_station(
        &mut self,
        attr: Option<&NativeObjectAttributes>,
        access: u32,
    ) -> NativeHandle;

    /// NtUserSetObjectInformation
    fn set_object_information(
        &mut self,
        handle: NativeHandle,
        index: i32,
        info: NativePtr,
        len: u32,
    ) -> u32;

    /// NtUserSetProcessWindowStation
    fn set_process_window_station(&mut self, winsta: NativeHandle) -> u32;

    /// NtUserSetThreadDesktop
    fn set_thread_desktop(&mut self, desktop: NativeHandle) -> u32;

    // Hooks and events

    /// NtUserNotifyWinEvent
    fn notify_win_event(&mut self, event: u32, hwnd: NativeHandle, object_id: i32, child_id: i32);

    /// NtUserSetWinEventHook
    fn set_win_event_hook(
        &mut self,
        event_min: u32,
        event_max: u32,
        inst: NativeHandle,
        module: Option<&UnicodeString64>,
        proc: NativePtr,
        pid: u32,
        tid: u32,
        flags: u32,
    ) -> NativeHandle;

    /// NtUserSetWindowsHookEx
    fn set_windows_hook_ex(
        &mut self,
        inst: NativeHandle,
        module: Option<&UnicodeString64>,
        tid: u32,
        id: i32,
        proc: NativePtr,
        ansi: u32,
    ) -> NativeHandle;

    /// NtUserUnhookWinEvent
    fn unhook_win_event(&mut self, hook: NativeHandle) -> u32;

    /// NtUserUnhookWindowsHookEx
    fn unhook_windows_hook_ex(&mut self, hook: NativeHandle) -> u32;

    // DPI

    /// NtUserGetDpiForMonitor
    fn get_dpi_for_monitor(
        &mut self,
        monitor: NativeHandle,
        kind: u32,
        x: NativePtr,
        y: NativePtr,
    ) -> u32;

    /// NtUserGetProcessDpiAwarenessContext
    fn get_process_dpi_awareness_context(&mut self, process: NativeHandle) -> u32;

    /// NtUserGetSystemDpiForProcess
    fn get_system_dpi_for_process(&mut self, process: NativeHandle) -> u32;

    /// NtUserSetProcessDpiAwarenessContext
    fn set_process_dpi_awareness_context(&mut self, awareness: u32, unknown: u32) -> u32;

    // Accelerators

    /// NtUserCopyAcceleratorTable - ACCEL entries have the same layout at both widths
    fn copy_accelerator_table(&mut self, src: NativeHandle, dst: NativePtr, count: i32) -> i32;

    /// NtUserCreateAcceleratorTable
    fn create_accelerator_table(&mut self, table: NativePtr, count: i32) -> NativeHandle;

    /// NtUserDestroyAcceleratorTable
    fn destroy_accelerator_table(&mut self, table: NativeHandle) -> u32;
}
