//! `modlat-generate`: Generates a catalog lattice and reports or exports it.
//!
//! **Outputs:**
//! - a one-line summary (default)
//! - the full `LatticeStructure` as JSON (`--json`), to stdout or `--out`
//! - the diagnostic dump (`--dump`), also printed for the partial state when
//!   generation fails
//!
//! **Usage:**
//! ```text
//! modlat-generate --lattice <name> [--json] [--out <path>] [--dump]
//!                 [--verify-each-step] [--check-relations] [--verbose]
//! modlat-generate --list
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use modlat::{run_generation, GenerationOptions, LatticeController, LatticeStructure};
use tracing::Level;

/// Generate a free modular lattice from the catalog.
#[derive(Parser)]
#[command(name = "modlat-generate", about = "Generate a free modular lattice")]
struct Args {
    /// Catalog name, e.g. `1-1-1` or `3-2`.
    #[arg(long)]
    lattice: Option<String>,

    /// Emit the generated structure as JSON.
    #[arg(long)]
    json: bool,

    /// Write JSON output to this file instead of stdout.
    #[arg(long, requires = "json")]
    out: Option<PathBuf>,

    /// Print the diagnostic dump after generation, or of the partial state
    /// on failure.
    #[arg(long)]
    dump: bool,

    /// Verify bounds and modular groups after every step.
    #[arg(long)]
    verify_each_step: bool,

    /// Re-check relation completeness after every step.
    #[arg(long)]
    check_relations: bool,

    /// List catalog entries, including development entries.
    #[arg(long)]
    list: bool,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        list_catalog();
        return Ok(());
    }
    let Some(name) = args.lattice.as_deref() else {
        bail!("--lattice is required unless --list is given");
    };

    let def = modlat::catalog::lookup(name)?;
    let options = GenerationOptions {
        verify_each_step: args.verify_each_step,
        check_relations_each_step: args.check_relations,
        ..GenerationOptions::default()
    };

    let mut controller = LatticeController::from_def(def)
        .with_context(|| format!("Failed to set up {}", def.label()))?;
    let outcome = run_generation(&mut controller, def, &options, |text| {
        eprintln!("  {text}");
    });
    if let Err(e) = outcome {
        if args.dump {
            eprintln!("{}", controller.dump_all());
        }
        return Err(e).with_context(|| format!("Failed to generate {}", def.label()));
    }

    if args.dump {
        println!("{}", controller.dump_all());
    }

    let structure = LatticeStructure::from_controller(&controller)
        .with_context(|| format!("Failed to build the structure of {}", def.label()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&structure)
            .context("Failed to serialize lattice structure to JSON")?;
        match &args.out {
            Some(path) => {
                fs::write(path, &json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("  Written: {}", path.display());
            }
            None => println!("{json}"),
        }
    } else {
        println!(
            "{}: bottom {}, top {}, {} covering edges",
            def.label(),
            structure.element_names[structure.bottom],
            structure.element_names[structure.top],
            structure.edges.len()
        );
    }
    Ok(())
}

fn list_catalog() {
    for def in modlat::catalog::all() {
        let seeds: Vec<String> = def.relations.iter().map(ToString::to_string).collect();
        println!(
            "{:<24} generators {:<12} seeds {}{}",
            def.label(),
            def.generators.join(" "),
            if seeds.is_empty() {
                "none".to_string()
            } else {
                seeds.join(", ")
            },
            if def.hidden { "  (hidden)" } else { "" }
        );
    }
}
