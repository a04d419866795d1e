use anyhow::Result;
use bondalayze_infrastructure::image_normalizer::{DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "bondalayze")]
#[command(about = "Bondalayze - relationship chat analysis backend", long_about = None)]
struct Cli {
    /// Configuration directory (defaults to ~/.config/bondalayze)
    #[arg(long, global = true, value_name = "DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overrides [server] bind
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Downsample screenshots and print them as JPEG data URLs
    Normalize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
        max_width: u32,
        #[arg(long, default_value_t = DEFAULT_QUALITY)]
        quality: f32,
    },
    /// Run one analysis against the configured provider and print the result
    Analyze {
        /// Conversation text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Read the conversation text from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Chat screenshot, may be repeated
        #[arg(long = "image", value_name = "IMAGE")]
        images: Vec<PathBuf>,
        #[arg(long, default_value = "free")]
        plan: bondalayze_core::Plan,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    bondalayze_server::logging::init();

    let cli = Cli::parse();
    let paths = bondalayze_infrastructure::BondaPaths::new(cli.config.as_deref());

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(&paths, bind).await?,
        Commands::Normalize {
            files,
            max_width,
            quality,
        } => commands::normalize::run(&files, max_width, quality)?,
        Commands::Analyze {
            text,
            file,
            images,
            plan,
        } => commands::analyze::run(&paths, text, file, &images, plan).await?,
    }

    Ok(())
}
