// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Entry-point tracing
//!
//! The dispatcher reports every call, its result and any stub notice through a
//! [`Tracer`]. Output is configurable per run and filtered by entry-point name
//! or category.

pub mod config;
pub mod event;
pub mod filter;
pub mod formatter;
pub mod tracer;

pub use config::{TraceConfig, TraceFormat, TraceOutput};
pub use event::{ApiCategory, EventType, TraceEvent};
pub use filter::{FilterRule, TraceFilter};
pub use formatter::{JsonFormatter, TextFormatter, TraceFormatter};
pub use tracer::Tracer;
