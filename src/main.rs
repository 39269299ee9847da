//! sysprops - print hardware and OS facts
//!
//! With no flags prints the CPU model, total RAM and OS name. Any failed
//! query terminates with its error.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use sysprops::{logging, Config, SystemProperties, Unit};

/// sysprops - CPU, memory, OS, GPU and storage facts
#[derive(Parser)]
#[command(name = "sysprops")]
#[command(version)]
#[command(about = "Print CPU, memory, OS, GPU and primary-drive facts")]
struct Cli {
    /// Print every fact instead of CPU, RAM and OS name
    #[arg(short, long)]
    all: bool,

    /// Print every fact as JSON
    #[arg(long)]
    json: bool,

    /// Unit for capacities (bytes, kb, mb, gb)
    #[arg(short, long)]
    unit: Option<Unit>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default config file if none exists, then exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;
    logging::init(&config.log_level);

    if cli.init_config {
        if config_path.exists() {
            println!(
                "{} {}",
                "Config already exists:".bright_yellow(),
                config_path.display()
            );
        } else {
            config.save_to(&config_path)?;
            println!(
                "{} {}",
                "Wrote default config to".bright_green(),
                config_path.display()
            );
        }
        return Ok(());
    }

    let props = SystemProperties::from_config(&config)
        .context("Failed to initialise system property queries")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&props.report(cli.unit))?);
    } else if cli.all {
        println!("{}", props.report(cli.unit).display());
    } else {
        println!("{} {}", "CPU:".bright_cyan(), props.cpu_model()?);
        println!("{} {}", "RAM:".bright_cyan(), props.ram_total(cli.unit)?);
        println!("{} {}", "OS: ".bright_cyan(), props.os_name()?);
    }

    Ok(())
}
