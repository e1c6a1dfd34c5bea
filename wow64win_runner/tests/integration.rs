// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Integration tests for the runner
//!
//! These tests build the same argument set the CLI would and check the
//! collected report.

use clap::Parser;
use wow64win_runner::{CliArgs, GuestDump, GuestWrite, execute};
use zerocopy::IntoBytes;

const BASE: u32 = 0x0040_0000;

fn args(thunk: &str, slots: Vec<u32>) -> CliArgs {
    CliArgs {
        thunk: Some(thunk.to_string()),
        slots,
        list: false,
        writes: vec![],
        dumps: vec![],
        memory_base: BASE,
        memory_size: 0x1000,
        demo_desktop: true,
        staging_limit: None,
        trace_apis: false,
        trace_format: "text".to_string(),
        trace_output: None,
        trace_filter: None,
        trace_category: None,
    }
}

#[test]
fn test_execute_reports_dump() {
    let mut cli = args(
        "NtUserBuildHwndList",
        vec![0, 0, 0, 0, 0, 4, BASE + 0x20, BASE + 0x10],
    );
    cli.dumps = vec![
        GuestDump {
            addr: BASE + 0x10,
            len: 4,
        },
        GuestDump {
            addr: BASE + 0x20,
            len: 12,
        },
    ];

    let report = execute(&cli).unwrap();
    assert_eq!(report.thunk, "NtUserBuildHwndList");
    assert_eq!(report.result, 0);
    assert_eq!(report.last_error, 0);
    assert_eq!(report.service_calls, vec!["BuildHwndList"]);
    assert_eq!(report.dumps[0].1, vec![3, 0, 0, 0]);
    assert_eq!(
        report.dumps[1].1,
        vec![0x20, 0, 0x01, 0, 0x24, 0, 0x01, 0, 0x28, 0, 0x01, 0]
    );
}

#[test]
fn test_execute_loads_guest_writes() {
    // Two wait handles, with input queued on the demo desktop
    let handles = [0x0000_0010u32, 0x0000_0014];
    let mut cli = args(
        "NtUserMsgWaitForMultipleObjectsEx",
        vec![2, BASE + 0x40, 0, 0xFF, 0],
    );
    cli.writes = vec![GuestWrite {
        addr: BASE + 0x40,
        bytes: handles.as_bytes().to_vec(),
    }];

    let report = execute(&cli).unwrap();
    assert_eq!(report.result, 2);
    assert_eq!(report.service_calls, vec!["MsgWaitForMultipleObjectsEx"]);
}

#[test]
fn test_execute_reports_last_error() {
    let cli = args("NtUserGetRawInputDeviceList", vec![0, BASE, 24]);

    let report = execute(&cli).unwrap();
    assert_eq!(report.result, u32::MAX);
    assert_eq!(report.last_error, 87);
    assert!(report.service_calls.is_empty());
}

#[test]
fn test_execute_staging_limit() {
    let mut cli = args("NtUserRegisterRawInputDevices", vec![BASE, 8, 12]);
    cli.staging_limit = Some(64);

    let report = execute(&cli).unwrap();
    assert_eq!(report.result, 0);
    assert_eq!(report.last_error, 8);
}

#[test]
fn test_execute_rejects_short_frame() {
    let cli = args("NtUserGetMessage", vec![BASE]);
    let err = execute(&cli).unwrap_err();
    assert!(err.to_string().contains("reads 4 argument slots, 1 provided"));
}

#[test]
fn test_write_outside_mapping_fails() {
    let mut cli = args("NtUserGetCursor", vec![]);
    cli.writes = vec![GuestWrite {
        addr: BASE + 0x1000,
        bytes: vec![1],
    }];
    assert!(execute(&cli).is_err());
}

#[test]
fn test_cli_parsing() {
    let cli = CliArgs::parse_from([
        "wow64win_runner",
        "--demo-desktop",
        "--write",
        "0x400000:0100",
        "--dump",
        "0x400000:2",
        "NtUserGetKeyState",
        "0x10",
    ]);
    assert_eq!(cli.thunk.as_deref(), Some("NtUserGetKeyState"));
    assert_eq!(cli.slots, vec![0x10]);
    assert!(cli.demo_desktop);
    assert_eq!(cli.memory_base, BASE);

    let report = execute(&cli).unwrap();
    // VK_SHIFT is held down on the demo desktop
    assert_eq!(report.result, 0xFFFF_FF80);
    assert_eq!(report.dumps, vec![(BASE, vec![0x01, 0x00])]);
}

#[test]
fn test_cli_negative_slots() {
    let cli = CliArgs::parse_from(["wow64win_runner", "NtUserGetAncestor", "-1", "1"]);
    assert_eq!(cli.slots, vec![u32::MAX, 1]);
}

#[test]
fn test_cli_list_needs_no_thunk() {
    let cli = CliArgs::parse_from(["wow64win_runner", "--list"]);
    assert!(cli.list);
    assert!(cli.thunk.is_none());
}

#[test]
fn test_rejects_unknown_entry_point() {
    let cli = CliArgs::parse_from(["wow64win_runner", "NtUserNoSuchCall"]);
    let err = execute(&cli).unwrap_err();
    assert!(err.to_string().contains("unknown entry point"));
}

#[test]
fn test_execute_writes_trace_file() {
    let path = std::env::temp_dir().join("wow64win_runner_trace.json");
    let _ = std::fs::remove_file(&path);
    let mut cli = args("NtUserGetCaretBlinkTime", vec![]);
    cli.trace_apis = true;
    cli.trace_format = "json".to_string();
    cli.trace_output = Some(path.to_string_lossy().into_owned());

    let report = execute(&cli).unwrap();
    assert_eq!(report.result, 530);

    let trace = std::fs::read_to_string(&path).unwrap();
    assert!(trace.contains("\"event\":\"call\""));
    assert!(trace.contains("\"function\":\"NtUserGetCaretBlinkTime\""));
    let _ = std::fs::remove_file(&path);
}
