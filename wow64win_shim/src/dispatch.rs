// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Entry-point dispatch
//!
//! The dispatcher owns the calling contract: it checks the frame against the
//! entry's slot count, runs the entry point, turns translation failures into
//! the entry's failure value and last error, and traces the call.

use crate::error;
use crate::frame::CallFrame;
use crate::table::{self, THUNK_TABLE, ThunkEntry};
use crate::thunks::ThunkContext;
use crate::tracing::{TraceEvent, Tracer};
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;

/// Calling-contract violations, detected before an entry point runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown entry point: {0}")]
    UnknownThunk(String),

    #[error("service index {0} is out of range")]
    UnknownIndex(usize),

    #[error("{name} reads {expected} argument slots, {provided} provided")]
    FrameTooShort {
        name: &'static str,
        expected: usize,
        provided: usize,
    },
}

/// Invokes entry points from [`THUNK_TABLE`]
#[derive(Default)]
pub struct Dispatcher {
    tracer: Option<Arc<Tracer>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher reporting every call through `tracer`
    pub fn with_tracer(tracer: Arc<Tracer>) -> Self {
        Self {
            tracer: Some(tracer),
        }
    }

    /// All entry points, sorted by name
    pub fn entries(&self) -> &'static [ThunkEntry] {
        &THUNK_TABLE
    }

    pub fn lookup(&self, name: &str) -> Option<&'static ThunkEntry> {
        table::lookup(name)
    }

    /// Invoke the entry point named `name`.
    pub fn call(
        &self,
        name: &str,
        ctx: &mut ThunkContext<'_>,
        slots: &[u32],
    ) -> Result<u32, DispatchError> {
        let entry =
            table::lookup(name).ok_or_else(|| DispatchError::UnknownThunk(name.to_string()))?;
        self.invoke(entry, ctx, slots)
    }

    /// Invoke the entry point at service index `index`.
    pub fn call_index(
        &self,
        index: usize,
        ctx: &mut ThunkContext<'_>,
        slots: &[u32],
    ) -> Result<u32, DispatchError> {
        let entry = THUNK_TABLE
            .get(index)
            .ok_or(DispatchError::UnknownIndex(index))?;
        self.invoke(entry, ctx, slots)
    }

    /// Invoke `entry` with the first `entry.arg_count` slots of `slots`.
    ///
    /// The result is the value the narrow caller sees: the service's result on
    /// success, the entry's failure value otherwise.
    pub fn invoke(
        &self,
        entry: &ThunkEntry,
        ctx: &mut ThunkContext<'_>,
        slots: &[u32],
    ) -> Result<u32, DispatchError> {
        let slots = slots
            .get(..entry.arg_count)
            .ok_or(DispatchError::FrameTooShort {
                name: entry.name,
                expected: entry.arg_count,
                provided: slots.len(),
            })?;

        let tracer = self.tracer.as_deref().filter(|tracer| tracer.is_enabled());
        if let Some(tracer) = tracer {
            tracer.trace(
                TraceEvent::call(entry.name, entry.category).with_args(format_slots(slots)),
            );
            if entry.fixme {
                tracer.trace(
                    TraceEvent::fixme(entry.name, entry.category)
                        .with_args("not translated".to_string()),
                );
            }
        }

        let mut frame = CallFrame::new(slots);
        let result = (entry.thunk)(ctx, &mut frame);
        debug_assert!(
            entry.fixme || frame.consumed() == entry.arg_count,
            "{} read {} of {} slots",
            entry.name,
            frame.consumed(),
            entry.arg_count
        );

        let (ret, failure) = match result {
            Ok(ret) => (ret, None),
            Err(err) => (error::report(&mut *ctx.last_error, entry.failure, &err), Some(err)),
        };

        if let Some(tracer) = tracer {
            let mut event = TraceEvent::return_event(entry.name, entry.category);
            event = match &failure {
                None => event.with_return_value(format!("0x{ret:08X}")),
                Some(err) => {
                    let event = event.with_return_value(format!("0x{ret:08X} ({err})"));
                    match err.last_error_code() {
                        Some(code) => event.with_last_error(code),
                        None => event,
                    }
                }
            };
            tracer.trace(event);
        }

        Ok(ret)
    }
}

fn format_slots(slots: &[u32]) -> String {
    let mut args = String::new();
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            args.push_str(", ");
        }
        let _ = write!(args, "0x{slot:08X}");
    }
    args
}
