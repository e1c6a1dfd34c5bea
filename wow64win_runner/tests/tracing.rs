// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Integration tests for entry-point tracing

use std::path::{Path, PathBuf};
use std::sync::Arc;
use wow64win_platform_headless::{
    FlatGuestMemory, HeadlessDesktop, HeadlessWin32u, ThreadErrorState,
};
use wow64win_shim::tracing::{
    ApiCategory, FilterRule, TraceConfig, TraceFilter, TraceFormat, TraceOutput, Tracer,
};
use wow64win_shim::{Dispatcher, ThunkContext};

const BASE: u32 = 0x0040_0000;

fn trace_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&path);
    path
}

/// Run `calls` through a dispatcher tracing to `path`, then return the trace.
fn run_traced(
    path: &Path,
    config: TraceConfig,
    filter: TraceFilter,
    calls: &[(&str, Vec<u32>)],
) -> String {
    let config = config.with_output(TraceOutput::File(path.to_path_buf()));
    let tracer = Arc::new(Tracer::new(config, filter).expect("Failed to create tracer"));
    let dispatcher = Dispatcher::with_tracer(tracer);

    let mut memory = FlatGuestMemory::new(BASE, 0x1000).expect("guest mapping");
    let mut service = HeadlessWin32u::with_desktop(HeadlessDesktop::demo());
    let mut errors = ThreadErrorState::new();
    let mut ctx = ThunkContext::new(&mut memory, &mut service, &mut errors);
    for (name, slots) in calls {
        dispatcher
            .call(name, &mut ctx, slots)
            .expect("dispatch should succeed");
    }
    drop(dispatcher);

    std::fs::read_to_string(path).expect("Failed to read trace file")
}

/// Test that tracing can be enabled and disabled
#[test]
fn test_tracing_enabled_disabled() {
    assert!(!TraceConfig::default().enabled);
    assert!(TraceConfig::enabled().enabled);
}

/// Test different trace formats
#[test]
fn test_trace_formats() {
    let config_text = TraceConfig::enabled().with_format(TraceFormat::Text);
    assert_eq!(config_text.format, TraceFormat::Text);

    let config_json = TraceConfig::enabled().with_format(TraceFormat::Json);
    assert_eq!(config_json.format, TraceFormat::Json);
}

/// Test text tracing of a successful call
#[test]
fn test_text_trace_of_call_and_return() {
    let path = trace_path("wow64win_trace_text.txt");
    let trace = run_traced(
        &path,
        TraceConfig::enabled().with_format(TraceFormat::Text),
        TraceFilter::new(),
        &[("NtUserGetCaretBlinkTime", vec![]), ("NtUserGetAncestor", vec![0x0001_002C, 2])],
    );

    assert!(trace.contains("CALL   NtUserGetCaretBlinkTime()"));
    assert!(trace.contains("RETURN NtUserGetCaretBlinkTime() -> 0x00000212"));
    assert!(trace.contains("NtUserGetAncestor(0x0001002C, 0x00000002)"));
    assert!(trace.contains("-> 0x00010020"));

    let _ = std::fs::remove_file(&path);
}

/// Test that failures carry the error and last-error code
#[test]
fn test_trace_of_failed_call() {
    let path = trace_path("wow64win_trace_failure.txt");
    let trace = run_traced(
        &path,
        TraceConfig::enabled(),
        TraceFilter::new(),
        &[("NtUserGetRawInputDeviceList", vec![0, BASE, 24])],
    );

    assert!(trace.contains("-> 0xFFFFFFFF"));
    assert!(trace.contains("[last error 87]"));

    let _ = std::fs::remove_file(&path);
}

/// Test that stubbed entry points announce themselves
#[test]
fn test_trace_of_stub() {
    let path = trace_path("wow64win_trace_stub.json");
    let trace = run_traced(
        &path,
        TraceConfig::enabled().with_format(TraceFormat::Json),
        TraceFilter::new(),
        &[("NtUserInitializeClientPfnArrays", vec![0, 0, 0, 0])],
    );

    assert!(trace.contains("\"event\":\"fixme\""));
    assert!(trace.contains("\"function\":\"NtUserInitializeClientPfnArrays\""));
    assert!(trace.contains("\"category\":\"unknown\""));

    let _ = std::fs::remove_file(&path);
}

/// Test trace filtering by pattern
#[test]
fn test_trace_filter_pattern() {
    let path = trace_path("wow64win_trace_pattern.txt");
    let trace = run_traced(
        &path,
        TraceConfig::enabled(),
        TraceFilter::new().add_rule(FilterRule::Pattern("NtUserGetCaret*".to_string())),
        &[("NtUserGetCaretBlinkTime", vec![]), ("NtUserGetDoubleClickTime", vec![])],
    );

    assert!(trace.contains("NtUserGetCaretBlinkTime"));
    assert!(!trace.contains("NtUserGetDoubleClickTime"));

    let _ = std::fs::remove_file(&path);
}

/// Test trace filtering by category
#[test]
fn test_trace_filter_category() {
    let path = trace_path("wow64win_trace_category.json");
    let trace = run_traced(
        &path,
        TraceConfig::enabled().with_format(TraceFormat::Json),
        TraceFilter::new().add_rule(FilterRule::Category(vec![ApiCategory::Dpi])),
        &[
            ("NtUserGetSystemDpiForProcess", vec![0]),
            ("NtUserGetForegroundWindow", vec![]),
        ],
    );

    assert!(trace.contains("NtUserGetSystemDpiForProcess"));
    assert!(!trace.contains("NtUserGetForegroundWindow"));
    assert!(trace.lines().all(|line| line.contains("\"category\":\"dpi\"")));

    let _ = std::fs::remove_file(&path);
}

/// Test that a disabled tracer writes nothing
#[test]
fn test_disabled_tracer_is_silent() {
    let path = trace_path("wow64win_trace_disabled.txt");
    let trace = run_traced(
        &path,
        TraceConfig::default(),
        TraceFilter::new(),
        &[("NtUserGetCursor", vec![])],
    );

    assert!(trace.is_empty());

    let _ = std::fs::remove_file(&path);
}
