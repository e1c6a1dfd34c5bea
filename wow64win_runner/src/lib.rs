// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Runner for single win32u entry points
//!
//! This crate provides the CLI interface for invoking one narrow entry point
//! against the headless service: the caller lays out guest memory, names the
//! entry point and its argument slots, and gets back the narrow result, the
//! last error and any memory it asked to see.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::sync::Arc;
use wow64win_platform_headless::{
    FlatGuestMemory, HeadlessDesktop, HeadlessWin32u, ThreadErrorState,
};
use wow64win_shim::tracing::{
    ApiCategory, FilterRule, TraceConfig, TraceFilter, TraceFormat, TraceOutput, Tracer,
};
use wow64win_shim::{Dispatcher, LastErrorSink, NarrowPtr, StagingConfig, ThunkContext};

/// Default start of the guest mapping
pub const DEFAULT_MEMORY_BASE: u32 = 0x0040_0000;
/// Default size of the guest mapping
pub const DEFAULT_MEMORY_SIZE: usize = 0x1_0000;

/// Invoke a win32u entry point the way a 32-bit client would
#[derive(Parser, Debug)]
#[command(name = "wow64win_runner")]
pub struct CliArgs {
    /// Entry point to invoke (e.g. NtUserGetMessage)
    #[arg(required_unless_present = "list")]
    pub thunk: Option<String>,

    /// 32-bit argument slots, decimal or 0x-prefixed hex
    #[arg(allow_negative_numbers = true, value_parser = parse_slot)]
    pub slots: Vec<u32>,

    /// List every entry point and exit
    #[arg(long)]
    pub list: bool,

    /// Load bytes into guest memory before the call (ADDR:HEXBYTES)
    #[arg(long = "write", value_name = "ADDR:HEX", value_parser = parse_write)]
    pub writes: Vec<GuestWrite>,

    /// Print guest memory after the call (ADDR:LEN)
    #[arg(long = "dump", value_name = "ADDR:LEN", value_parser = parse_dump)]
    pub dumps: Vec<GuestDump>,

    /// Start of the guest mapping
    #[arg(long, default_value_t = DEFAULT_MEMORY_BASE, value_parser = parse_slot)]
    pub memory_base: u32,

    /// Size of the guest mapping in bytes
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
    pub memory_size: usize,

    /// Populate the headless desktop with windows, messages and raw input
    #[arg(long)]
    pub demo_desktop: bool,

    /// Per-call staging budget in bytes
    #[arg(long)]
    pub staging_limit: Option<usize>,

    /// Enable API tracing
    #[arg(long, default_value = "false")]
    pub trace_apis: bool,

    /// Trace output format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub trace_format: String,

    /// Trace output file, or `-` for stderr (default: stdout)
    #[arg(long)]
    pub trace_output: Option<String>,

    /// Filter traced entry points by pattern (e.g., "NtUserGet*")
    #[arg(long)]
    pub trace_filter: Option<String>,

    /// Filter traced entry points by category (window, message, raw_input, ...)
    #[arg(long)]
    pub trace_category: Option<String>,
}

/// Bytes to load at a guest address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestWrite {
    pub addr: u32,
    pub bytes: Vec<u8>,
}

/// Guest range to print after the call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestDump {
    pub addr: u32,
    pub len: usize,
}

/// Outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub thunk: &'static str,
    /// Value the narrow caller sees
    pub result: u32,
    pub last_error: u32,
    /// Native calls the entry point made, in order
    pub service_calls: Vec<&'static str>,
    pub dumps: Vec<(u32, Vec<u8>)>,
}

/// Parse a slot value: decimal, negative decimal or 0x-prefixed hex.
#[allow(clippy::cast_sign_loss)]
pub fn parse_slot(value: &str) -> Result<u32, String> {
    let value = value.trim();
    let parsed = if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if value.starts_with('-') {
        value.parse::<i32>().ok().map(|v| v as u32)
    } else {
        value.parse::<u32>().ok()
    };
    parsed.ok_or_else(|| format!("invalid slot value '{value}'"))
}

fn split_pair(value: &str) -> Result<(u32, &str), String> {
    let (addr, rest) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ADDR:VALUE, got '{value}'"))?;
    Ok((parse_slot(addr)?, rest))
}

/// Parse `ADDR:HEXBYTES`.
pub fn parse_write(value: &str) -> Result<GuestWrite, String> {
    let (addr, hex) = split_pair(value)?;
    if hex.is_empty() || !hex.len().is_multiple_of(2) {
        return Err(format!("'{hex}' is not a whole number of hex bytes"));
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex byte in '{hex}'"))
        })
        .collect::<Result<Vec<u8>, String>>()?;
    Ok(GuestWrite { addr, bytes })
}

/// Parse `ADDR:LEN`.
pub fn parse_dump(value: &str) -> Result<GuestDump, String> {
    let (addr, len) = split_pair(value)?;
    let len = parse_slot(len)? as usize;
    Ok(GuestDump { addr, len })
}

fn build_tracer(cli_args: &CliArgs) -> Result<Option<Arc<Tracer>>> {
    if !cli_args.trace_apis {
        return Ok(None);
    }

    let format = TraceFormat::parse(&cli_args.trace_format)
        .ok_or_else(|| anyhow!("Unknown trace format: {}", cli_args.trace_format))?;
    let mut trace_config = TraceConfig::enabled().with_format(format);
    if let Some(output) = &cli_args.trace_output {
        trace_config = trace_config.with_output(TraceOutput::parse(output));
    }

    let mut trace_filter = TraceFilter::new();
    if let Some(pattern) = &cli_args.trace_filter {
        trace_filter = trace_filter.add_rule(FilterRule::Pattern(pattern.clone()));
    }
    if let Some(category_str) = &cli_args.trace_category {
        let category = ApiCategory::parse(category_str).ok_or_else(|| {
            let valid: Vec<String> = ApiCategory::ALL.iter().map(ToString::to_string).collect();
            anyhow!(
                "Unknown category: {category_str}. Valid options: {}",
                valid.join(", ")
            )
        })?;
        trace_filter = trace_filter.add_rule(FilterRule::Category(vec![category]));
    }

    let tracer = Tracer::new(trace_config, trace_filter).context("failed to open trace output")?;
    Ok(Some(Arc::new(tracer)))
}

/// Invoke the entry point described by `cli_args` and collect the outcome.
pub fn execute(cli_args: &CliArgs) -> Result<RunReport> {
    let name = cli_args
        .thunk
        .as_deref()
        .ok_or_else(|| anyhow!("no entry point given"))?;

    let mut memory = FlatGuestMemory::new(cli_args.memory_base, cli_args.memory_size)?;
    for write in &cli_args.writes {
        memory
            .load(NarrowPtr(write.addr), &write.bytes)
            .with_context(|| format!("loading {} bytes at 0x{:08X}", write.bytes.len(), write.addr))?;
    }

    let desktop = if cli_args.demo_desktop {
        HeadlessDesktop::demo()
    } else {
        HeadlessDesktop::new()
    };
    let mut service = HeadlessWin32u::with_desktop(desktop);
    let mut last_error = ThreadErrorState::new();

    let dispatcher = match build_tracer(cli_args)? {
        Some(tracer) => Dispatcher::with_tracer(tracer),
        None => Dispatcher::new(),
    };
    let entry = dispatcher
        .lookup(name)
        .ok_or_else(|| anyhow!("unknown entry point: {name}"))?;

    let mut staging = StagingConfig::default();
    if let Some(limit) = cli_args.staging_limit {
        staging = staging.with_limit(limit);
    }

    let result = {
        let mut ctx = ThunkContext::new(&mut memory, &mut service, &mut last_error)
            .with_staging(staging);
        dispatcher.invoke(entry, &mut ctx, &cli_args.slots)?
    };

    let dumps = cli_args
        .dumps
        .iter()
        .map(|dump| {
            memory
                .dump(NarrowPtr(dump.addr), dump.len)
                .map(|bytes| (dump.addr, bytes.to_vec()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RunReport {
        thunk: entry.name,
        result,
        last_error: last_error.last_error(),
        service_calls: service.calls().iter().map(|call| call.name).collect(),
        dumps,
    })
}

fn print_entries(dispatcher: &Dispatcher) {
    for (index, entry) in dispatcher.entries().iter().enumerate() {
        let note = if entry.fixme { "  (stub)" } else { "" };
        println!(
            "{index:3}  {:<40} {} slots  {}{note}",
            entry.name, entry.arg_count, entry.category
        );
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run one entry point and print the outcome
pub fn run(cli_args: CliArgs) -> Result<()> {
    if cli_args.list {
        print_entries(&Dispatcher::new());
        return Ok(());
    }
    let report = execute(&cli_args)?;
    println!("{} -> 0x{:08X}", report.thunk, report.result);
    println!("  Last error: {}", report.last_error);
    if report.service_calls.is_empty() {
        println!("  Native calls: none");
    } else {
        println!("  Native calls: {}", report.service_calls.join(", "));
    }
    for (addr, bytes) in &report.dumps {
        println!("  0x{addr:08X}: {}", hex_bytes(bytes));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot() {
        assert_eq!(parse_slot("42"), Ok(42));
        assert_eq!(parse_slot("0x10000003"), Ok(0x1000_0003));
        assert_eq!(parse_slot("-1"), Ok(u32::MAX));
        assert!(parse_slot("0xZZ").is_err());
        assert!(parse_slot("4294967296").is_err());
    }

    #[test]
    fn test_parse_write_and_dump() {
        assert_eq!(
            parse_write("0x400000:DEADbeef"),
            Ok(GuestWrite {
                addr: 0x40_0000,
                bytes: vec![0xDE, 0xAD, 0xBE, 0xEF],
            })
        );
        assert!(parse_write("0x400000:ABC").is_err());
        assert!(parse_write("0x400000").is_err());
        assert_eq!(
            parse_dump("0x400010:16"),
            Ok(GuestDump {
                addr: 0x40_0010,
                len: 16
            })
        );
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[0x01, 0xAB]), "01 AB");
        assert_eq!(hex_bytes(&[]), "");
    }
}
