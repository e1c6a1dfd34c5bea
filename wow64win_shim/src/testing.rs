// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Helpers shared by unit tests

use crate::memory::GuestMemory;
use crate::width::NarrowPtr;
use crate::{Result, Wow64Error};

/// Base of [`TestMemory`]; everything below it is unmapped
pub const BASE: u32 = 0x0001_0000;

/// Zeroed narrow memory mapped at [`BASE`]
pub struct TestMemory {
    bytes: Vec<u8>,
    pub writes: usize,
}

impl TestMemory {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
            writes: 0,
        }
    }

    pub fn at(offset: u32) -> NarrowPtr {
        NarrowPtr(BASE + offset)
    }

    pub fn bytes(&self, offset: u32, len: usize) -> &[u8] {
        &self.bytes[offset as usize..offset as usize + len]
    }

    pub fn fill(&mut self, offset: u32, byte: u8, len: usize) {
        self.bytes[offset as usize..offset as usize + len].fill(byte);
    }

    fn range(&self, addr: NarrowPtr, len: usize) -> Result<core::ops::Range<usize>> {
        let start = addr
            .0
            .checked_sub(BASE)
            .ok_or(Wow64Error::AccessViolation(addr.0))? as usize;
        let end = start + len;
        if end > self.bytes.len() {
            return Err(Wow64Error::AccessViolation(addr.0));
        }
        Ok(start..end)
    }
}

impl GuestMemory for TestMemory {
    fn read(&self, addr: NarrowPtr, buf: &mut [u8]) -> Result<()> {
        let range = self.range(addr, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, addr: NarrowPtr, data: &[u8]) -> Result<()> {
        let range = self.range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}
