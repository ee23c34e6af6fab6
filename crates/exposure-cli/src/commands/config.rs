//! Config command implementation.
//!
//! Shows, creates and locates the run configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::{GlobalOptions, OutputFormat};
use crate::error::CliError;
use crate::output::{print_header, print_info, print_output, print_success, KeyValue};
use crate::settings::{RunConfig, DEFAULT_CONFIG_FILE};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init(InitArgs),

    /// Show which configuration file is used
    Path,
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// File to write
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, globals: &GlobalOptions) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(globals),
        ConfigCommand::Init(init_args) => execute_init(init_args, globals.quiet),
        ConfigCommand::Path => execute_path(globals),
    }
}

/// Show the effective configuration.
fn execute_show(globals: &GlobalOptions) -> Result<()> {
    let (config, _) = RunConfig::load(globals.config.as_deref())?;

    match globals.format {
        OutputFormat::Json => crate::output::print_json(&config),
        OutputFormat::Csv | OutputFormat::Table => {
            let fx = config.fx_table()?;
            let mut results = vec![
                KeyValue::new("date_format", &config.date_format),
                KeyValue::new("delimiter", &config.delimiter),
                KeyValue::new("anonymize", config.anonymize.to_string()),
                KeyValue::new("cash_asset_class", &config.cash_asset_class),
                KeyValue::new(
                    "unmapped_currency",
                    serde_json::to_value(config.unmapped_currency)?
                        .as_str()
                        .unwrap_or_default(),
                ),
            ];
            results.extend(
                fx.iter()
                    .map(|(ccy, rate)| KeyValue::new(format!("fx_rates.{ccy}"), rate.to_string())),
            );

            if globals.format == OutputFormat::Table && !globals.quiet {
                print_header("Current Configuration");
            }
            print_output(&results, globals.format)
        }
    }
}

/// Write a default configuration file.
fn execute_init(args: InitArgs, quiet: bool) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.path).into());
    }

    std::fs::write(&args.path, RunConfig::default().to_toml()?)?;
    if !quiet {
        print_success(&format!("Wrote {}", args.path.display()));
    }
    Ok(())
}

/// Show configuration file path.
fn execute_path(globals: &GlobalOptions) -> Result<()> {
    let (_, source) = RunConfig::load(globals.config.as_deref())?;
    match source {
        Some(path) => print_info(&format!("Config file: {}", path.display())),
        None => print_info(&format!(
            "Config file: none ({DEFAULT_CONFIG_FILE} not found, using defaults)"
        )),
    }
    Ok(())
}
