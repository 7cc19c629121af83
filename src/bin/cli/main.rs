//! CLI tool for WAD container operations.

mod commands;
mod exit_codes;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WAD resource container tool
#[derive(Parser)]
#[command(name = "wadex")]
#[command(author, version, about = "WAD resource container tool", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress informational output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List archive entries (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,
    },

    /// Show archive information (alias: i)
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,
    },

    /// Extract an entry to a file (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to read
        archive: PathBuf,

        /// Entry name (case-insensitive)
        entry: String,

        /// Output path (defaults to the entry's file name)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Add a file as a new entry (alias: a)
    #[command(alias = "a")]
    Add {
        /// Archive file to modify
        archive: PathBuf,

        /// Entry name inside the archive
        name: String,

        /// File whose bytes become the entry payload
        file: PathBuf,
    },

    /// Replace an entry's payload with a file's bytes (alias: r)
    #[command(alias = "r")]
    Replace {
        /// Archive file to modify
        archive: PathBuf,

        /// Entry name (case-insensitive)
        entry: String,

        /// File whose bytes become the new payload
        file: PathBuf,
    },

    /// Remove an entry (alias: rm)
    #[command(alias = "rm")]
    Remove {
        /// Archive file to modify
        archive: PathBuf,

        /// Entry name (case-insensitive)
        entry: String,
    },

    /// Render a texture pack's frames to PNG files
    Frames {
        /// Archive file to read
        archive: PathBuf,

        /// Frame-description entry name (`.meta`)
        entry: String,

        /// Output directory for the rendered frames
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Integer zoom factor
        #[arg(short = 'z', long, default_value = "1")]
        zoom: u32,

        /// Background color as RRGGBB hex
        #[arg(short = 'b', long, default_value = "000000")]
        background: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let code = match &cli.command {
        Commands::List { archive } => commands::list(archive),
        Commands::Info { archive } => commands::info(archive),
        Commands::Extract {
            archive,
            entry,
            output,
        } => commands::extract(archive, entry, output.as_deref(), cli.quiet),
        Commands::Add {
            archive,
            name,
            file,
        } => commands::add(archive, name, file, cli.quiet),
        Commands::Replace {
            archive,
            entry,
            file,
        } => commands::replace(archive, entry, file, cli.quiet),
        Commands::Remove { archive, entry } => commands::remove(archive, entry, cli.quiet),
        Commands::Frames {
            archive,
            entry,
            output,
            zoom,
            background,
        } => commands::frames(archive, entry, output, *zoom, background, cli.quiet),
    };

    std::process::exit(code.code());
}
