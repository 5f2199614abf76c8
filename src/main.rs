//! Campus Concierge entry point

use campus_concierge::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Campus Concierge: Q&A over the academic calendar, faculty and clubs
#[derive(Parser, Debug)]
#[command(name = "campus-concierge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Dataset directory (overrides data.dir)
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default behavior)
    Serve {
        /// Listen address. If not specified, uses config file value.
        #[arg(long)]
        host: Option<String>,
        /// Listen port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// Answer one question through the full pipeline
    Ask {
        /// Question text
        text: String,
        /// Declared category (calendar, teacher, clubs, weather, data_qa, other)
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the intent a question is routed to
    Classify {
        /// Question text
        text: String,
    },
    /// List loaded datasets and record counts
    Datasets,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    if let Some(dir) = &args.data_dir {
        config.data.dir = dir.clone();
    }
    Ok(config)
}

fn init_server_logging(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.command {
        Some(Command::Serve { json_logs, .. }) => init_server_logging(*json_logs),
        None => init_server_logging(false),
        Some(_) => {
            // Minimal logging for one-shot commands
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let mut config = load_config(&args)?;

    match args.command {
        Some(Command::Serve { host, port, .. }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            tracing::info!("Starting Campus Concierge v{}", env!("CARGO_PKG_VERSION"));
            cli::run_serve(config).await
        }
        None => {
            tracing::info!("Starting Campus Concierge v{}", env!("CARGO_PKG_VERSION"));
            cli::run_serve(config).await
        }
        Some(Command::Ask { text, category }) => cli::run_ask(config, text, category, args.json).await,
        Some(Command::Classify { text }) => cli::run_classify(config, text, args.json).await,
        Some(Command::Datasets) => cli::run_datasets(config, args.json),
    }
}
