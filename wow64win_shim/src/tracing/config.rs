// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! What the dispatcher records about each entry-point call, and where

use std::path::PathBuf;

/// Layout of one CALL/RETURN/FIXME line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// `CALL   NtUserGetMessage(0x00400300, ...)` lines
    Text,
    /// One JSON object per event
    Json,
}

impl TraceFormat {
    /// Parse a `--trace-format` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where trace lines go
#[derive(Debug, Clone)]
pub enum TraceOutput {
    Stdout,
    /// Keeps the trace apart from the runner's report on stdout
    Stderr,
    /// Created (or truncated) when the tracer opens
    File(PathBuf),
}

impl TraceOutput {
    /// Parse a `--trace-output` value: `-` is stderr, anything else a path.
    pub fn parse(value: &str) -> Self {
        match value {
            "-" => Self::Stderr,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

/// Entry-point tracing settings
///
/// Disabled by default; the runner enables it with `--trace-apis`.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub enabled: bool,
    pub format: TraceFormat,
    pub output: TraceOutput,
    /// Prefix each event with seconds since the epoch
    pub include_timestamps: bool,
    /// Prefix each event with the calling thread
    pub include_thread_ids: bool,
    /// Append `[last error N]` to RETURN events of calls that failed a
    /// precondition
    pub include_last_error: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: TraceFormat::Text,
            output: TraceOutput::Stdout,
            include_timestamps: true,
            include_thread_ids: true,
            include_last_error: true,
        }
    }
}

impl TraceConfig {
    /// Tracing on, text to stdout
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: TraceFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: TraceOutput) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.include_timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.include_thread_ids = enable;
        self
    }

    #[must_use]
    pub fn with_last_error(mut self, enable: bool) -> Self {
        self.include_last_error = enable;
        self
    }
}
