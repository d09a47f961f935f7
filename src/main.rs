//! Swagger client builder - command-line tool for generating a Python client base class.
//!
//! Fetches a Swagger 2.0 document, refuses it unless its SHA-256 matches the
//! pinned digest, applies the override table and writes one abstract class
//! with a method per `GET` operation.
//!
//! # Usage
//!
//! ```bash
//! client-from-swagger [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Regenerate the Fitbit client with the built-in pin and overrides:
//! ```bash
//! client-from-swagger -o fitbit_web/api.py
//! ```
//!
//! Generate from a local document with its own pin and override table:
//! ```bash
//! client-from-swagger -s swagger.json --sha256 <HEX> --overrides overrides.yaml
//! ```
//!
//! Print the digest of a document after reviewing it:
//! ```bash
//! client-from-swagger -s swagger.json --print-digest
//! ```

use anyhow::Result;
use clap::Parser;
use client_from_swagger::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger client builder starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Client generation completed successfully");

    Ok(())
}
