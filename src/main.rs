// src/main.rs
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dsk2mac::{load_handler, parse_geometry, Geometry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Macintosh 3.5\" Disk Image Nibblizer")]
struct Cli {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Display {
        #[arg(long)]
        ascii: bool,
    },
    Convert {
        #[arg(long, default_value = "mac")]
        format: String,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, value_parser = parse_geometry, default_value = "auto")]
        geometry: Geometry,
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let handler = load_handler(&cli.input)?;

    match cli.command {
        Commands::Display { ascii } => println!("{}", handler.display(ascii)?),
        Commands::Convert { format, output, geometry, validate } => {
            if format != "mac" {
                return Err(anyhow!("Unknown target format: {}", format));
            }
            handler.convert(&output, geometry, validate)?;
            if let Some(Geometry::Manual { sides }) = handler.geometry()? {
                println!("Source geometry: {} side(s)", sides);
            }
            println!("Converted to {}", output.display());
        }
    }
    Ok(())
}
