// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! The entry-point table
//!
//! Entries are sorted by name so the dispatcher can look them up by binary
//! search; a service index is a position in [`THUNK_TABLE`].

use crate::error::FailureReturn;
use crate::thunks::{ThunkFn, clipboard, desktop, input, menu, message, raw_input, window};
use crate::tracing::ApiCategory;

/// One entry point
#[derive(Clone, Copy)]
pub struct ThunkEntry {
    /// Service name, `NtUser` prefix included
    pub name: &'static str,
    /// Number of argument slots the entry point reads
    pub arg_count: usize,
    pub category: ApiCategory,
    /// Value returned when the translation layer itself fails
    pub failure: FailureReturn,
    /// The entry point is a stub and does not reach the service
    pub fixme: bool,
    pub thunk: ThunkFn,
}

impl core::fmt::Debug for ThunkEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThunkEntry")
            .field("name", &self.name)
            .field("arg_count", &self.arg_count)
            .field("category", &self.category)
            .field("failure", &self.failure)
            .field("fixme", &self.fixme)
            .finish_non_exhaustive()
    }
}

macro_rules! thunk_table {
    ($($name:literal: $args:literal, $category:ident, $failure:ident, $fixme:literal => $thunk:path;)*) => {
        [$(
            ThunkEntry {
                name: $name,
                arg_count: $args,
                category: ApiCategory::$category,
                failure: FailureReturn::$failure,
                fixme: $fixme,
                thunk: $thunk,
            },
        )*]
    };
}

/// Number of entry points
pub const THUNK_COUNT: usize = 94;

#[rustfmt::skip]
pub static THUNK_TABLE: [ThunkEntry; THUNK_COUNT] = thunk_table! {
    "NtUserAddClipboardFormatListener": 1, Clipboard, False, false => clipboard::nt_user_add_clipboard_format_listener;
    "NtUserAssociateInputContext": 3, InputContext, False, false => input::nt_user_associate_input_context;
    "NtUserAttachThreadInput": 3, Keyboard, False, false => input::nt_user_attach_thread_input;
    "NtUserBuildHwndList": 8, Window, Status, false => window::nt_user_build_hwnd_list;
    "NtUserCallMsgFilter": 2, Message, False, false => message::nt_user_call_msg_filter;
    "NtUserCheckMenuItem": 3, Menu, False, false => menu::nt_user_check_menu_item;
    "NtUserChildWindowFromPointEx": 4, Window, False, false => window::nt_user_child_window_from_point_ex;
    "NtUserCloseDesktop": 1, Desktop, False, false => desktop::nt_user_close_desktop;
    "NtUserCloseWindowStation": 1, Desktop, False, false => desktop::nt_user_close_window_station;
    "NtUserCopyAcceleratorTable": 3, Accelerator, False, false => clipboard::nt_user_copy_accelerator_table;
    "NtUserCreateAcceleratorTable": 2, Accelerator, False, false => clipboard::nt_user_create_accelerator_table;
    "NtUserCreateDesktopEx": 6, Desktop, False, false => desktop::nt_user_create_desktop_ex;
    "NtUserCreateInputContext": 1, InputContext, False, false => input::nt_user_create_input_context;
    "NtUserCreateWindowStation": 7, Desktop, False, false => desktop::nt_user_create_window_station;
    "NtUserDeleteMenu": 3, Menu, False, false => menu::nt_user_delete_menu;
    "NtUserDestroyAcceleratorTable": 1, Accelerator, False, false => clipboard::nt_user_destroy_accelerator_table;
    "NtUserDestroyInputContext": 1, InputContext, False, false => input::nt_user_destroy_input_context;
    "NtUserDispatchMessage": 1, Message, False, false => message::nt_user_dispatch_message;
    "NtUserEndMenu": 0, Menu, False, false => menu::nt_user_end_menu;
    "NtUserFindExistingCursorIcon": 3, Cursor, False, false => input::nt_user_find_existing_cursor_icon;
    "NtUserFindWindowEx": 5, Window, False, false => window::nt_user_find_window_ex;
    "NtUserGetAncestor": 2, Window, False, false => window::nt_user_get_ancestor;
    "NtUserGetAtomName": 2, Clipboard, False, false => clipboard::nt_user_get_atom_name;
    "NtUserGetCaretBlinkTime": 0, Cursor, False, false => input::nt_user_get_caret_blink_time;
    "NtUserGetCaretPos": 1, Cursor, False, false => input::nt_user_get_caret_pos;
    "NtUserGetClassName": 3, Window, False, false => window::nt_user_get_class_name;
    "NtUserGetClipboardFormatName": 3, Clipboard, False, false => clipboard::nt_user_get_clipboard_format_name;
    "NtUserGetClipboardOwner": 0, Clipboard, False, false => clipboard::nt_user_get_clipboard_owner;
    "NtUserGetClipboardSequenceNumber": 0, Clipboard, False, false => clipboard::nt_user_get_clipboard_sequence_number;
    "NtUserGetClipboardViewer": 0, Clipboard, False, false => clipboard::nt_user_get_clipboard_viewer;
    "NtUserGetCursor": 0, Cursor, False, false => input::nt_user_get_cursor;
    "NtUserGetCursorFrameInfo": 4, Cursor, False, false => input::nt_user_get_cursor_frame_info;
    "NtUserGetDoubleClickTime": 0, Cursor, False, false => input::nt_user_get_double_click_time;
    "NtUserGetDpiForMonitor": 4, Dpi, False, false => desktop::nt_user_get_dpi_for_monitor;
    "NtUserGetForegroundWindow": 0, Window, False, false => window::nt_user_get_foreground_window;
    "NtUserGetGUIThreadInfo": 2, Window, False, false => window::nt_user_get_gui_thread_info;
    "NtUserGetIconSize": 4, Cursor, False, false => input::nt_user_get_icon_size;
    "NtUserGetKeyState": 1, Keyboard, False, false => input::nt_user_get_key_state;
    "NtUserGetKeyboardLayout": 1, Keyboard, False, false => input::nt_user_get_keyboard_layout;
    "NtUserGetKeyboardLayoutName": 1, Keyboard, False, false => input::nt_user_get_keyboard_layout_name;
    "NtUserGetKeyboardState": 1, Keyboard, False, false => input::nt_user_get_keyboard_state;
    "NtUserGetLayeredWindowAttributes": 4, Window, False, false => window::nt_user_get_layered_window_attributes;
    "NtUserGetMenuItemRect": 4, Menu, False, false => menu::nt_user_get_menu_item_rect;
    "NtUserGetMessage": 4, Message, False, false => message::nt_user_get_message;
    "NtUserGetMouseMovePointsEx": 5, Cursor, AllOnes, false => input::nt_user_get_mouse_move_points_ex;
    "NtUserGetObjectInformation": 5, Desktop, False, false => desktop::nt_user_get_object_information;
    "NtUserGetOpenClipboardWindow": 0, Clipboard, False, false => clipboard::nt_user_get_open_clipboard_window;
    "NtUserGetProcessDpiAwarenessContext": 1, Dpi, False, false => desktop::nt_user_get_process_dpi_awareness_context;
    "NtUserGetProcessWindowStation": 0, Desktop, False, false => desktop::nt_user_get_process_window_station;
    "NtUserGetProp": 2, Window, False, false => window::nt_user_get_prop;
    "NtUserGetRawInputBuffer": 3, RawInput, AllOnes, false => raw_input::nt_user_get_raw_input_buffer;
    "NtUserGetRawInputData": 5, RawInput, AllOnes, false => raw_input::nt_user_get_raw_input_data;
    "NtUserGetRawInputDeviceInfo": 4, RawInput, AllOnes, false => raw_input::nt_user_get_raw_input_device_info;
    "NtUserGetRawInputDeviceList": 3, RawInput, AllOnes, false => raw_input::nt_user_get_raw_input_device_list;
    "NtUserGetRegisteredRawInputDevices": 3, RawInput, AllOnes, false => raw_input::nt_user_get_registered_raw_input_devices;
    "NtUserGetSystemDpiForProcess": 1, Dpi, False, false => desktop::nt_user_get_system_dpi_for_process;
    "NtUserGetThreadDesktop": 1, Desktop, False, false => desktop::nt_user_get_thread_desktop;
    "NtUserGetTitleBarInfo": 2, Window, False, false => window::nt_user_get_title_bar_info;
    "NtUserGetWindowRgnEx": 3, Window, False, false => window::nt_user_get_window_rgn_ex;
    "NtUserInitializeClientPfnArrays": 4, Unknown, Status, true => desktop::nt_user_initialize_client_pfn_arrays;
    "NtUserInternalGetWindowText": 3, Window, False, false => window::nt_user_internal_get_window_text;
    "NtUserKillTimer": 2, Message, False, false => message::nt_user_kill_timer;
    "NtUserLockWindowUpdate": 1, Window, False, false => window::nt_user_lock_window_update;
    "NtUserMenuItemFromPoint": 4, Menu, False, false => menu::nt_user_menu_item_from_point;
    "NtUserMessageCall": 7, Message, False, true => message::nt_user_message_call;
    "NtUserMsgWaitForMultipleObjectsEx": 5, Message, AllOnes, false => message::nt_user_msg_wait_for_multiple_objects_ex;
    "NtUserNotifyWinEvent": 4, Hook, False, false => desktop::nt_user_notify_win_event;
    "NtUserOpenDesktop": 3, Desktop, False, false => desktop::nt_user_open_desktop;
    "NtUserOpenInputDesktop": 3, Desktop, False, false => desktop::nt_user_open_input_desktop;
    "NtUserOpenWindowStation": 2, Desktop, False, false => desktop::nt_user_open_window_station;
    "NtUserQueryInputContext": 2, InputContext, False, false => input::nt_user_query_input_context;
    "NtUserRegisterRawInputDevices": 3, RawInput, False, false => raw_input::nt_user_register_raw_input_devices;
    "NtUserRemoveClipboardFormatListener": 1, Clipboard, False, false => clipboard::nt_user_remove_clipboard_format_listener;
    "NtUserRemoveMenu": 3, Menu, False, false => menu::nt_user_remove_menu;
    "NtUserRemoveProp": 2, Window, False, false => window::nt_user_remove_prop;
    "NtUserSetKeyboardState": 1, Keyboard, False, false => input::nt_user_set_keyboard_state;
    "NtUserSetMenuContextHelpId": 2, Menu, False, false => menu::nt_user_set_menu_context_help_id;
    "NtUserSetMenuDefaultItem": 3, Menu, False, false => menu::nt_user_set_menu_default_item;
    "NtUserSetObjectInformation": 4, Desktop, False, false => desktop::nt_user_set_object_information;
    "NtUserSetProcessDpiAwarenessContext": 2, Dpi, False, false => desktop::nt_user_set_process_dpi_awareness_context;
    "NtUserSetProcessWindowStation": 1, Desktop, False, false => desktop::nt_user_set_process_window_station;
    "NtUserSetProp": 3, Window, False, false => window::nt_user_set_prop;
    "NtUserSetSystemTimer": 3, Message, False, false => message::nt_user_set_system_timer;
    "NtUserSetThreadDesktop": 1, Desktop, False, false => desktop::nt_user_set_thread_desktop;
    "NtUserSetTimer": 5, Message, False, false => message::nt_user_set_timer;
    "NtUserSetWinEventHook": 8, Hook, False, false => desktop::nt_user_set_win_event_hook;
    "NtUserSetWindowsHookEx": 6, Hook, False, false => desktop::nt_user_set_windows_hook_ex;
    "NtUserThunkedMenuInfo": 2, Menu, False, false => menu::nt_user_thunked_menu_info;
    "NtUserThunkedMenuItemInfo": 6, Menu, False, false => menu::nt_user_thunked_menu_item_info;
    "NtUserTrackPopupMenuEx": 6, Menu, False, false => menu::nt_user_track_popup_menu_ex;
    "NtUserUnhookWinEvent": 1, Hook, False, false => desktop::nt_user_unhook_win_event;
    "NtUserUnhookWindowsHookEx": 1, Hook, False, false => desktop::nt_user_unhook_windows_hook_ex;
    "NtUserUpdateInputContext": 3, InputContext, False, false => input::nt_user_update_input_context;
    "NtUserWindowFromDC": 1, Window, False, false => window::nt_user_window_from_dc;
};

/// Index of `name` in [`THUNK_TABLE`]
pub fn index_of(name: &str) -> Option<usize> {
    THUNK_TABLE
        .binary_search_by(|entry| entry.name.cmp(name))
        .ok()
}

/// The entry named `name`
pub fn lookup(name: &str) -> Option<&'static ThunkEntry> {
    index_of(name).map(|index| &THUNK_TABLE[index])
}
