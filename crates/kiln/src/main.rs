//! kiln CLI - visual UI component builder with code export.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Visual UI component builder with live preview and code export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to kiln.toml config file
    #[arg(short, long, default_value = "kiln.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create kiln.toml and a sample component config
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// List available components
    List {
        /// Only show one category (basic, form, layout, feedback, data)
        #[arg(long)]
        category: Option<String>,

        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a saved component config
    Export {
        /// Saved config (.json, .yaml, .yml)
        input: PathBuf,

        /// Formats to write (defaults to config or all)
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<String>,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Minify CSS
        #[arg(long)]
        minify: bool,
    },

    /// Export every saved config in a directory
    Batch {
        /// Directory of saved configs
        input: PathBuf,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify CSS
        #[arg(long)]
        minify: bool,
    },

    /// Start the interactive builder with live preview
    Dev {
        /// Port to listen on (defaults to config or 7878)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Saved config to load and reload on change
        #[arg(short, long)]
        watch: Option<PathBuf>,
    },

    /// Preview a batch export
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Export directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::List { category, json } => {
            commands::list::run(category.as_deref(), json)?;
        }
        Commands::Export {
            input,
            format,
            output,
            stdout,
            minify,
        } => {
            let file_config = config::load(&cli.config)?;
            let options = commands::export::ExportOptions {
                formats: format,
                output,
                stdout,
                minify: minify.then_some(true),
            };
            commands::export::run(&file_config, &input, options).await?;
        }
        Commands::Batch {
            input,
            output,
            minify,
        } => {
            let file_config = config::load(&cli.config)?;
            commands::batch::run(&file_config, &input, output, minify.then_some(true)).await?;
        }
        Commands::Dev {
            port,
            no_open,
            watch,
        } => {
            let file_config = config::load(&cli.config)?;
            commands::dev::run(&file_config, port, !no_open, watch).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, &dir, !no_open).await?;
        }
    }

    Ok(())
}
