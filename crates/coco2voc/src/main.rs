//! coco2voc CLI - COCO instance annotations to VOC-style label masks.
//!
//! coco2voc reads a COCO annotation file and writes, for every annotated image,
//! a class mask, an instance mask and a unique-instance-id array, plus a
//! manifest of converted image ids.
//!
//! # Usage
//!
//! ```bash
//! # Convert a whole annotation file
//! coco2voc convert instances_val2017.json ./voc
//!
//! # Convert the first 50 annotated images, uncompressed id arrays
//! coco2voc convert instances_val2017.json ./voc -n 50 --no-compress
//!
//! # Inspect an annotation file
//! coco2voc info instances_val2017.json
//!
//! # View configuration
//! coco2voc config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// coco2voc - Convert COCO annotations into class, instance and id label masks.
#[derive(Parser, Debug)]
#[command(name = "coco2voc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an annotation file into label masks
    Convert(cli::convert::ConvertArgs),

    /// Summarise the contents of an annotation file
    Info(cli::info::InfoArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match coco2voc_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `coco2voc config path`."
            );
            coco2voc_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("coco2voc v{}", coco2voc_core::VERSION);

    match cli.command {
        Commands::Convert(args) => cli::convert::execute(args, config),
        Commands::Info(args) => cli::info::execute(args, config),
        Commands::Config(args) => cli::config::execute(args),
    }
}
