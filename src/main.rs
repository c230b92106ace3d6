//! CLI entry point for dollar-latex

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dollar-latex")]
#[command(version)]
#[command(about = "Rewrites inline $...$ math into {% latex %} tags", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite pages and posts into the public folder
    #[command(alias = "b")]
    Build,

    /// List content units and their math spans
    List {
        /// Type of content to list (post, page, all)
        #[arg(default_value = "all")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Transform one file, or stdin, and print the result
    Transform {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Format tag to use instead of the file's extension
        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "dollar_latex=debug,info"
    } else {
        "dollar_latex=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Build => {
            let site = dollar_latex::Site::new(&base_dir)?;
            tracing::info!("Building {:?}", site.source_dir);
            let report = site.build()?;
            println!("Built successfully: {}", report.summary());
        }

        Commands::List { r#type, json } => {
            let site = dollar_latex::Site::new(&base_dir)?;
            dollar_latex::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Transform { file, ext } => {
            let site = dollar_latex::Site::new(&base_dir)?;
            let output =
                dollar_latex::commands::transform::run(&site, file.as_deref(), ext.as_deref())?;
            print!("{}", output);
        }

        Commands::Clean => {
            let site = dollar_latex::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("dollar-latex version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
