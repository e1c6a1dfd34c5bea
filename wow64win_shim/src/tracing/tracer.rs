// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Main tracer component

use super::{
    config::{TraceConfig, TraceFormat, TraceOutput},
    event::TraceEvent,
    filter::TraceFilter,
    formatter::{JsonFormatter, TextFormatter, TraceFormatter},
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex};

/// Tracer for entry-point calls
pub struct Tracer {
    config: TraceConfig,
    filter: TraceFilter,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    formatter: Box<dyn TraceFormatter + Send + Sync>,
}

impl Tracer {
    /// Create a new tracer with the given configuration
    pub fn new(config: TraceConfig, filter: TraceFilter) -> io::Result<Self> {
        let writer: Box<dyn Write + Send> = match &config.output {
            TraceOutput::Stdout => Box::new(io::stdout()),
            TraceOutput::Stderr => Box::new(io::stderr()),
            TraceOutput::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        };
        Ok(Self::with_writer(config, filter, writer))
    }

    /// Create a tracer that writes to `writer` regardless of the configured output
    pub fn with_writer(
        config: TraceConfig,
        filter: TraceFilter,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        let formatter: Box<dyn TraceFormatter + Send + Sync> = match config.format {
            TraceFormat::Text => Box::new(TextFormatter::new()),
            TraceFormat::Json => Box::new(JsonFormatter::new()),
        };

        Self {
            config,
            filter,
            writer: Arc::new(Mutex::new(writer)),
            formatter,
        }
    }

    /// Trace an event
    pub fn trace(&self, event: TraceEvent) {
        if !self.config.enabled || !self.filter.should_trace(&event) {
            return;
        }

        if let Ok(mut writer) = self.writer.lock() {
            let _ = self.formatter.format(&event, &self.config, &mut *writer);
            let _ = writer.flush();
        }
    }

    /// Check if tracing is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
