// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Trace event definitions

use std::fmt;
use std::time::SystemTime;

/// Category of traced entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCategory {
    /// Window enumeration, properties and text
    Window,
    /// Message retrieval, dispatch, waits and timers
    Message,
    /// Menus
    Menu,
    /// Keyboard state and layouts
    Keyboard,
    /// Raw input records and devices
    RawInput,
    /// Cursor, caret and mouse history
    Cursor,
    /// Input method contexts
    InputContext,
    /// Clipboard and atoms
    Clipboard,
    /// Desktops and window stations
    Desktop,
    /// Window hooks and accessibility events
    Hook,
    /// DPI awareness
    Dpi,
    /// Accelerator tables
    Accelerator,
    /// Unknown/uncategorized
    Unknown,
}

impl ApiCategory {
    /// Every category, in display order
    pub const ALL: [ApiCategory; 13] = [
        ApiCategory::Window,
        ApiCategory::Message,
        ApiCategory::Menu,
        ApiCategory::Keyboard,
        ApiCategory::RawInput,
        ApiCategory::Cursor,
        ApiCategory::InputContext,
        ApiCategory::Clipboard,
        ApiCategory::Desktop,
        ApiCategory::Hook,
        ApiCategory::Dpi,
        ApiCategory::Accelerator,
        ApiCategory::Unknown,
    ];

    /// Parse a category from its display name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.to_string() == name)
    }
}

impl fmt::Display for ApiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiCategory::Window => write!(f, "window"),
            ApiCategory::Message => write!(f, "message"),
            ApiCategory::Menu => write!(f, "menu"),
            ApiCategory::Keyboard => write!(f, "keyboard"),
            ApiCategory::RawInput => write!(f, "raw_input"),
            ApiCategory::Cursor => write!(f, "cursor"),
            ApiCategory::InputContext => write!(f, "input_context"),
            ApiCategory::Clipboard => write!(f, "clipboard"),
            ApiCategory::Desktop => write!(f, "desktop"),
            ApiCategory::Hook => write!(f, "hook"),
            ApiCategory::Dpi => write!(f, "dpi"),
            ApiCategory::Accelerator => write!(f, "accelerator"),
            ApiCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// Trace event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Entry point invoked
    Call,
    /// Entry point returned
    Return,
    /// Entry point is a stub
    Fixme,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Call => write!(f, "CALL"),
            EventType::Return => write!(f, "RETURN"),
            EventType::Fixme => write!(f, "FIXME"),
        }
    }
}

/// A traced entry-point event
#[derive(Debug, Clone)]
pub struct TraceEvent {
    /// Timestamp of the event
    pub timestamp: SystemTime,
    /// Thread ID (if available)
    pub thread_id: Option<u64>,
    /// Event type
    pub event_type: EventType,
    /// API category
    pub category: ApiCategory,
    /// Entry point name
    pub function: String,
    /// Argument slots (formatted as string)
    pub args: Option<String>,
    /// Return value (formatted as string)
    pub return_value: Option<String>,
    /// Last error set by the translation layer, if any
    pub last_error: Option<u32>,
}

impl TraceEvent {
    fn new(event_type: EventType, function: &str, category: ApiCategory) -> Self {
        Self {
            timestamp: SystemTime::now(),
            thread_id: None,
            event_type,
            category,
            function: function.to_string(),
            args: None,
            return_value: None,
            last_error: None,
        }
    }

    /// Create a new call event
    pub fn call(function: &str, category: ApiCategory) -> Self {
        Self::new(EventType::Call, function, category)
    }

    /// Create a new return event
    pub fn return_event(function: &str, category: ApiCategory) -> Self {
        Self::new(EventType::Return, function, category)
    }

    /// Create a stub notice
    pub fn fixme(function: &str, category: ApiCategory) -> Self {
        Self::new(EventType::Fixme, function, category)
    }

    /// Set the arguments for this event
    #[must_use]
    pub fn with_args(mut self, args: String) -> Self {
        self.args = Some(args);
        self
    }

    /// Set the return value for this event
    #[must_use]
    pub fn with_return_value(mut self, return_value: String) -> Self {
        self.return_value = Some(return_value);
        self
    }

    /// Set the thread ID for this event
    #[must_use]
    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = Some(thread_id);
        self
    }

    #[must_use]
    pub fn with_last_error(mut self, code: u32) -> Self {
        self.last_error = Some(code);
        self
    }
}
