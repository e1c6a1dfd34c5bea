// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Scripted desktop state behind the headless service
//!
//! Nothing is ever drawn: windows, queued messages, raw input and the mouse
//! history are fixed up front, and the service answers queries from them.

use std::collections::VecDeque;
use wow64win_shim::layout::{
    GuiThreadInfo64, MouseMovePoint64, Msg64, Point, RawInputDevice64, RawInputDeviceList64,
    RawInputHeader64, Rect, StructKind, TitleBarInfo,
};
use wow64win_shim::service::raw_input::{RIM_TYPEHID, RIM_TYPEKEYBOARD, RIM_TYPEMOUSE};
use wow64win_shim::width::NativeHandle;

const WM_KEYDOWN: u32 = 0x0100;
const WM_TIMER: u32 = 0x0113;
const WM_QUIT: u32 = 0x0012;
const WM_INPUT: u32 = 0x00FF;

/// A top-level or child window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub hwnd: NativeHandle,
    /// Null for top-level windows
    pub parent: NativeHandle,
    pub thread_id: u32,
}

/// One raw input record, retrievable by its `HRAWINPUT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputPacket {
    pub handle: NativeHandle,
    pub header: RawInputHeader64,
    pub body: Vec<u8>,
}

impl RawInputPacket {
    pub fn new(handle: NativeHandle, dw_type: u32, device: NativeHandle, body: Vec<u8>) -> Self {
        let header = RawInputHeader64 {
            dw_type,
            dw_size: u32::try_from(body.len())
                .unwrap_or(u32::MAX)
                .saturating_add(StructKind::RawInputHeader.native_size()),
            h_device: device,
            w_param: 0,
        };
        Self {
            handle,
            header,
            body,
        }
    }

    /// Native size of the whole record
    pub fn native_size(&self) -> u32 {
        self.header.dw_size
    }
}

/// Everything the headless service knows about its desktop
#[derive(Debug, Clone, Default)]
pub struct HeadlessDesktop {
    pub windows: Vec<HeadlessWindow>,
    pub foreground: NativeHandle,
    pub messages: VecDeque<Msg64>,
    pub raw_input: Vec<RawInputPacket>,
    pub devices: Vec<RawInputDeviceList64>,
    pub registered: Vec<RawInputDevice64>,
    /// Newest first
    pub mouse_history: Vec<MouseMovePoint64>,
    pub gui_thread: GuiThreadInfo64,
    pub title_bar: TitleBarInfo,
    pub cursor: NativeHandle,
    pub key_states: Vec<(i32, i16)>,
}

impl HeadlessDesktop {
    /// An empty desktop
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_window(mut self, hwnd: NativeHandle, parent: NativeHandle) -> Self {
        self.windows.push(HeadlessWindow {
            hwnd,
            parent,
            thread_id: 1,
        });
        if self.foreground.is_null() && parent.is_null() {
            self.foreground = hwnd;
        }
        self
    }

    #[must_use]
    pub fn with_message(mut self, msg: Msg64) -> Self {
        self.messages.push_back(msg);
        self
    }

    #[must_use]
    pub fn with_raw_input(mut self, packet: RawInputPacket) -> Self {
        self.raw_input.push(packet);
        self
    }

    #[must_use]
    pub fn with_device(mut self, device: NativeHandle, dw_type: u32) -> Self {
        self.devices.push(RawInputDeviceList64 {
            h_device: device,
            dw_type,
            _pad0: 0,
        });
        self
    }

    #[must_use]
    pub fn with_registered(mut self, device: RawInputDevice64) -> Self {
        self.registered.push(device);
        self
    }

    /// Record a mouse position; later points are newer.
    #[must_use]
    pub fn with_mouse_point(mut self, x: i32, y: i32, time: u32) -> Self {
        self.mouse_history.insert(
            0,
            MouseMovePoint64 {
                x,
                y,
                time,
                ..MouseMovePoint64::default()
            },
        );
        self
    }

    #[must_use]
    pub fn with_gui_thread_info(mut self, info: GuiThreadInfo64) -> Self {
        self.gui_thread = info;
        self
    }

    #[must_use]
    pub fn with_title_bar(mut self, info: TitleBarInfo) -> Self {
        self.title_bar = info;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: NativeHandle) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn with_key_state(mut self, vkey: i32, state: i16) -> Self {
        self.key_states.push((vkey, state));
        self
    }

    pub fn window(&self, hwnd: NativeHandle) -> Option<&HeadlessWindow> {
        self.windows.iter().find(|window| window.hwnd == hwnd)
    }

    pub fn key_state(&self, vkey: i32) -> i16 {
        self.key_states
            .iter()
            .rev()
            .find(|(key, _)| *key == vkey)
            .map_or(0, |(_, state)| *state)
    }

    /// A small populated desktop: three top-level windows and a child, a few
    /// queued messages, one record per raw input device type and a short
    /// mouse trail.
    pub fn demo() -> Self {
        let main = NativeHandle(0x0001_0020);
        let tool = NativeHandle(0x0001_0024);
        let status = NativeHandle(0x0001_0028);
        let button = NativeHandle(0x0001_002C);
        let mouse = NativeHandle(0x0001_0101);
        let keyboard = NativeHandle(0x0001_0102);
        let hid = NativeHandle(0x0001_0103);

        let message = |message, w_param, l_param, time| Msg64 {
            hwnd: main,
            message,
            w_param,
            l_param,
            time,
            pt: Point { x: 120, y: 80 },
            ..Msg64::default()
        };

        Self::new()
            .with_window(main, NativeHandle::NULL)
            .with_window(tool, NativeHandle::NULL)
            .with_window(status, NativeHandle::NULL)
            .with_window(button, main)
            .with_message(message(WM_KEYDOWN, 0x41, 0x001E_0001, 1000))
            .with_message(message(WM_INPUT, 0, 0x0002_0001, 1010))
            .with_message(message(WM_TIMER, 7, 0, 1020))
            .with_message(message(WM_QUIT, 0, 0, 1030))
            .with_raw_input(RawInputPacket::new(
                NativeHandle(0x0002_0001),
                RIM_TYPEMOUSE,
                mouse,
                vec![0x01, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0xFB, 0xFF, 0xFF, 0xFF],
            ))
            .with_raw_input(RawInputPacket::new(
                NativeHandle(0x0002_0002),
                RIM_TYPEKEYBOARD,
                keyboard,
                vec![0x1E, 0x00, 0x00, 0x00, 0x41, 0x00, 0x00, 0x01],
            ))
            .with_raw_input(RawInputPacket::new(
                NativeHandle(0x0002_0003),
                RIM_TYPEHID,
                hid,
                vec![0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xDE, 0xAD, 0xBE, 0xEF],
            ))
            .with_device(mouse, RIM_TYPEMOUSE)
            .with_device(keyboard, RIM_TYPEKEYBOARD)
            .with_device(hid, RIM_TYPEHID)
            .with_registered(RawInputDevice64 {
                us_usage_page: 1,
                us_usage: 2,
                dw_flags: 0,
                hwnd_target: main,
            })
            .with_mouse_point(100, 60, 990)
            .with_mouse_point(110, 70, 995)
            .with_mouse_point(120, 80, 1000)
            .with_gui_thread_info(GuiThreadInfo64 {
                flags: 0x1,
                hwnd_active: main,
                hwnd_focus: button,
                hwnd_caret: button,
                rc_caret: Rect {
                    left: 10,
                    top: 4,
                    right: 11,
                    bottom: 20,
                },
                ..GuiThreadInfo64::default()
            })
            .with_title_bar(TitleBarInfo {
                rc_title_bar: Rect {
                    left: 0,
                    top: 0,
                    right: 640,
                    bottom: 24,
                },
                ..TitleBarInfo::default()
            })
            .with_cursor(NativeHandle(0x0001_0040))
            .with_key_state(0x10, -128)
    }
}
