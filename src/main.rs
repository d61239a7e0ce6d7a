//! Audax Codec CLI Application
//!
//! A command-line interface for inspecting addresses, scripts and packed
//! transaction records.

use audax_codec::cli;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audax-codec")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Address and packed transaction codec for Audax", long_about = None)]
struct Cli {
    /// Network: main, test or regtest (overrides the config file)
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the descriptor of an address
    Address {
        /// Base58Check or Bech32 address
        address: String,
    },

    /// Show the display addresses of a script
    Script {
        /// Script bytes as hex
        script: String,
    },

    /// Decode a packed record
    Unpack {
        /// Packed record as hex
        record: String,
    },

    /// Pack a JSON transaction
    Pack {
        /// Path to the transaction JSON file
        file: PathBuf,

        /// Height of the confirming block
        #[arg(long)]
        height: u32,

        /// Unix time of the confirming block
        #[arg(long, allow_negative_numbers = true)]
        block_time: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let codec = cli::build_codec(cli.network.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Commands::Address { address } => cli::cmd_address(&codec, &address),
        Commands::Script { script } => cli::cmd_script(&codec, &script),
        Commands::Unpack { record } => cli::cmd_unpack(&codec, &record),
        Commands::Pack {
            file,
            height,
            block_time,
        } => cli::cmd_pack(&codec, &file, height, block_time),
    }
}
