// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Last-error state of the calling thread

use wow64win_shim::LastErrorSink;

/// Last-error value of one narrow thread
#[derive(Debug, Default, Clone)]
pub struct ThreadErrorState {
    code: u32,
    updates: usize,
}

impl ThreadErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the last error was set
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl LastErrorSink for ThreadErrorState {
    fn set_last_error(&mut self, code: u32) {
        self.code = code;
        self.updates += 1;
    }

    fn last_error(&self) -> u32 {
        self.code
    }
}
