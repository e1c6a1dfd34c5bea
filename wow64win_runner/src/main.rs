// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! CLI entry point for the win32u runner.

use anyhow::Result;
use clap::Parser;
use wow64win_runner::CliArgs;

fn main() -> Result<()> {
    wow64win_runner::run(CliArgs::parse())
}
