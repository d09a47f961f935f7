use crate::fetch::{self, Source};
use crate::generator::GeneratorOptions;
use crate::naming::{is_python_identifier, is_python_keyword};
use crate::overrides::{fitbit_overrides, FITBIT_API_JSON, FITBIT_API_NAME, FITBIT_API_SHA256};
use crate::patcher::{self, Override};
use crate::pipeline::Pipeline;
use crate::writer::{write_module, WriteOutcome};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// Swagger client builder - generate a typed Python client base class from a pinned Swagger document
#[derive(Parser, Debug)]
#[command(name = "client-from-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// URL or file path of the Swagger JSON document
    #[arg(short = 's', long = "source", value_name = "URL_OR_FILE", default_value = FITBIT_API_JSON)]
    pub source: String,

    /// Pinned SHA-256 of the document (defaults to the built-in pin for the built-in source)
    #[arg(long = "sha256", value_name = "HEX")]
    pub sha256: Option<String>,

    /// Override table file, YAML or JSON (defaults to the built-in table for the built-in source)
    #[arg(long = "overrides", value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Python module providing the format_* helpers, imported as `utils`
    #[arg(long = "utils-module", value_name = "MODULE", default_value = "fitbit_web.utils")]
    pub utils_module: String,

    /// Name of the generated abstract class
    #[arg(long = "class-name", value_name = "NAME", default_value = "FitbitWebApi")]
    pub class_name: String,

    /// API name used in the generated docstrings (defaults to the document title)
    #[arg(long = "api-name", value_name = "NAME")]
    pub api_name: Option<String>,

    /// Indentation unit: `tab` or a number of spaces
    #[arg(long = "spacing", value_name = "tab|N", default_value = "tab", value_parser = parse_spacing)]
    pub spacing: String,

    /// Print the SHA-256 of the source document and exit
    #[arg(long = "print-digest")]
    pub print_digest: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

fn parse_spacing(value: &str) -> std::result::Result<String, String> {
    if value.eq_ignore_ascii_case("tab") {
        return Ok("\t".to_string());
    }
    match value.parse::<usize>() {
        Ok(width) if (1..=16).contains(&width) => Ok(" ".repeat(width)),
        _ => Err(format!("expected `tab` or a number of spaces between 1 and 16, got `{}`", value)),
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !is_python_identifier(&args.class_name) || is_python_keyword(&args.class_name) {
        anyhow::bail!("Class name is not a Python identifier: {}", args.class_name);
    }

    if !args
        .utils_module
        .split('.')
        .all(|part| is_python_identifier(part) && !is_python_keyword(part))
    {
        anyhow::bail!("Utils module is not a dotted Python module path: {}", args.utils_module);
    }

    if let Some(ref overrides) = args.overrides {
        if !overrides.is_file() {
            anyhow::bail!("Override table does not exist: {}", overrides.display());
        }
    }

    info!("Source: {}", args.source);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Resolves the pin and the override table, falling back to the built-in
/// preset only when the source is the built-in document.
fn build_pipeline(args: &CliArgs) -> Result<Pipeline> {
    let builtin_source = args.source == FITBIT_API_JSON;

    let expected_sha256 = match &args.sha256 {
        Some(pin) => Some(pin.clone()),
        None if builtin_source => Some(FITBIT_API_SHA256.to_string()),
        None => None,
    };

    let overrides: Vec<Override> = match &args.overrides {
        Some(path) => patcher::load_table(path)
            .with_context(|| format!("Failed to load override table {}", path.display()))?,
        None if builtin_source => fitbit_overrides(),
        None => Vec::new(),
    };
    info!("Using {} overrides", overrides.len());

    let api_name = match &args.api_name {
        Some(name) => Some(name.clone()),
        None if builtin_source => Some(FITBIT_API_NAME.to_string()),
        None => None,
    };

    let options = GeneratorOptions {
        utils_module: args.utils_module.clone(),
        class_name: args.class_name.clone(),
        spacing: args.spacing.clone(),
        api_name,
    };

    Ok(Pipeline::new(expected_sha256, overrides, options))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting client generation...");

    // Step 1: Fetch the raw document
    let source = Source::parse(&args.source);
    let raw = fetch::fetch(&source)?;

    if args.print_digest {
        println!("{}", fetch::sha256_hex(&raw));
        return Ok(());
    }

    // Step 2: Verify, patch, validate and generate
    let pipeline = build_pipeline(&args)?;
    let content = pipeline.run(&raw)?;

    // Step 3: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        if write_module(&content, output_path)? == WriteOutcome::Written {
            info!("Successfully wrote client to {}", output_path.display());
        }
    } else {
        print!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["client-from-swagger"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.source, FITBIT_API_JSON);
        assert_eq!(args.spacing, "\t");
        assert_eq!(args.utils_module, "fitbit_web.utils");
        assert_eq!(args.class_name, "FitbitWebApi");
        assert!(args.sha256.is_none());
        assert!(!args.print_digest);
    }

    #[test]
    fn test_spacing_parser() {
        assert_eq!(args(&["--spacing", "4"]).spacing, "    ");
        assert_eq!(args(&["--spacing", "TAB"]).spacing, "\t");
        assert!(CliArgs::try_parse_from(["client-from-swagger", "--spacing", "wide"]).is_err());
        assert!(CliArgs::try_parse_from(["client-from-swagger", "--spacing", "0"]).is_err());
    }

    #[test]
    fn test_builtin_preset_for_builtin_source() {
        let pipeline = build_pipeline(&args(&[])).unwrap();
        assert_eq!(pipeline.expected_sha256.as_deref(), Some(FITBIT_API_SHA256));
        assert_eq!(pipeline.overrides.len(), fitbit_overrides().len());
        assert_eq!(pipeline.options.api_name.as_deref(), Some(FITBIT_API_NAME));
    }

    #[test]
    fn test_no_preset_for_other_sources() {
        let pipeline = build_pipeline(&args(&["--source", "swagger.json"])).unwrap();
        assert!(pipeline.expected_sha256.is_none());
        assert!(pipeline.overrides.is_empty());
        assert!(pipeline.options.api_name.is_none());

        let pipeline =
            build_pipeline(&args(&["--source", "swagger.json", "--sha256", "abc"])).unwrap();
        assert_eq!(pipeline.expected_sha256.as_deref(), Some("abc"));
    }

    #[test]
    fn test_generator_options_from_args() {
        let pipeline = build_pipeline(&args(&[
            "--utils-module",
            "my.utils",
            "--class-name",
            "MyApi",
            "--spacing",
            "2",
        ]))
        .unwrap();
        assert_eq!(pipeline.options.utils_module, "my.utils");
        assert_eq!(pipeline.options.class_name, "MyApi");
        assert_eq!(pipeline.options.spacing, "  ");
    }

    #[test]
    fn test_api_name_flag_wins_over_preset() {
        let pipeline = build_pipeline(&args(&["--api-name", "Fitbit"])).unwrap();
        assert_eq!(pipeline.options.api_name.as_deref(), Some("Fitbit"));

        let pipeline =
            build_pipeline(&args(&["--source", "swagger.json", "--api-name", "Acme API"])).unwrap();
        assert_eq!(pipeline.options.api_name.as_deref(), Some("Acme API"));
    }

    #[test]
    fn test_validation_of_names() {
        assert!(parse_args_from_parsed(args(&["--class-name", "1Api"])).is_err());
        assert!(parse_args_from_parsed(args(&["--class-name", "class"])).is_err());
        assert!(parse_args_from_parsed(args(&["--utils-module", "pkg.import"])).is_err());
        assert!(parse_args_from_parsed(args(&["--utils-module", "bad..module"])).is_err());
        assert!(parse_args_from_parsed(args(&["--overrides", "/no/such/table.yaml"])).is_err());
        assert!(parse_args_from_parsed(args(&["--utils-module", "pkg.sub_mod"])).is_ok());
    }
}
