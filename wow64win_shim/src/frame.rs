// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Argument-stream decoding
//!
//! The narrow calling convention passes every argument in one 32-bit slot,
//! whatever its meaning. Each accessor consumes exactly one slot.

use crate::width::{NarrowHandle, NarrowPtr, NativeHandle};

/// Read cursor over the argument slots of one call
#[derive(Debug)]
pub struct CallFrame<'a> {
    slots: &'a [u32],
    cursor: usize,
}

impl<'a> CallFrame<'a> {
    pub fn new(slots: &'a [u32]) -> Self {
        Self { slots, cursor: 0 }
    }

    fn next_slot(&mut self) -> u32 {
        // The dispatcher hands over exactly the declared slot count.
        debug_assert!(
            self.cursor < self.slots.len(),
            "call frame exhausted after {} slots",
            self.cursor
        );
        let value = self.slots.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        value
    }

    /// Next slot as an unsigned integer
    pub fn get_ulong(&mut self) -> u32 {
        self.next_slot()
    }

    /// Next slot as a signed integer
    #[allow(clippy::cast_possible_wrap)]
    pub fn get_long(&mut self) -> i32 {
        self.next_slot() as i32
    }

    /// Next slot as a handle, sign-extended to native width
    pub fn get_handle(&mut self) -> NativeHandle {
        NarrowHandle(self.next_slot()).sign_extend()
    }

    /// Next slot as a narrow pointer; never dereferenced here
    pub fn get_ptr(&mut self) -> NarrowPtr {
        NarrowPtr(self.next_slot())
    }

    /// Next slot as a pointer-sized unsigned integer (`UINT_PTR`)
    pub fn get_uint_ptr(&mut self) -> u64 {
        u64::from(self.next_slot())
    }

    /// Number of slots read so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Number of slots not yet read
    pub fn remaining(&self) -> usize {
        self.slots.len().saturating_sub(self.cursor)
    }
}
