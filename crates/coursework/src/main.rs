//! Coursework CLI - turn challenge Markdown into stubs, solutions and a site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "coursework")]
#[command(about = "Build challenge stubs, generated solutions and a static site from course Markdown")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to course.toml config file
    #[arg(short, long, default_value = "course.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a course in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Convert challenge files into runnable stub files
    Stubs {
        /// Output directory (defaults to config or "challenges")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only read the top-level directory and write stubs side by side
        #[arg(long)]
        flat: bool,
    },

    /// Build the static HTML site
    Build {
        /// Output directory (defaults to config or "course")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Generate missing solution files
    Solutions,

    /// Correct sample code in challenge files in place
    Correct,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // API keys may live in a .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Every command but init reads course.toml
    let load_config = || ConfigFile::load(&cli.config);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Stubs { output, flat } => {
            commands::stubs::run(&load_config()?, output, flat).await?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&load_config()?, output, minify).await?;
        }
        Commands::Solutions => {
            commands::solutions::run(&load_config()?).await?;
        }
        Commands::Correct => {
            commands::correct::run(&load_config()?).await?;
        }
    }

    Ok(())
}
