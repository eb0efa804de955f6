//! `modlat-conformance`: Generates catalog lattices and validates their
//! order and lattice invariants.
//!
//! **Usage:**
//! ```text
//! modlat-conformance [--max-elements <n>] [--verify-each-step]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::Result;
use clap::Parser;
use modlat::GenerationOptions;
use modlat_conformance::{run_all, ConformanceOptions, Severity};
use tracing::Level;

/// Run the modlat conformance suite.
#[derive(Parser)]
#[command(
    name = "modlat-conformance",
    about = "Validate generated lattices against order and lattice invariants"
)]
struct Args {
    /// Skip catalog entries with more elements than this.
    #[arg(long, default_value_t = 200)]
    max_elements: usize,

    /// Also run every per-step check during generation.
    #[arg(long)]
    verify_each_step: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ConformanceOptions {
        max_elements: args.max_elements,
        generation: if args.verify_each_step {
            GenerationOptions::checked()
        } else {
            GenerationOptions::default()
        },
    };
    let report = run_all(&options)?;

    println!("modlat Conformance Report");
    println!("=========================");
    println!();

    for result in &report.results {
        println!(
            "[{}] {} {}: {}",
            result.severity.tag(),
            result.lattice,
            result.validator,
            result.message
        );
        for detail in &result.details {
            println!("       {detail}");
        }
    }

    let passed = report.count(Severity::Pass);
    let warned = report.count(Severity::Warning);
    let failed = report.failure_count();
    println!();
    println!("Summary: {passed} passed, {warned} warnings, {failed} failed");

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
