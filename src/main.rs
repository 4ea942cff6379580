use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engram::config::EngramConfig;
use engram::server;
use engram::storage::{FileStorageProvider, StorageProvider};

#[derive(Parser)]
#[command(name = "engram", version, about = "Project-scoped knowledge graph MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (transport chosen by config: stdio or http)
    Serve,
    /// Create the collection directories under the configured storage root
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = EngramConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => match config.server.transport.as_str() {
            "http" => server::serve_http(config).await?,
            "stdio" => server::serve_stdio(config).await?,
            other => anyhow::bail!("unknown transport '{other}' (expected 'stdio' or 'http')"),
        },
        Command::Init => {
            let root = config.resolved_root_path();
            let storage = FileStorageProvider::new(&root);
            for collection in server::COLLECTIONS {
                storage.create_collection(collection)?;
                println!("collection '{collection}' ready");
            }
            println!("storage initialized at {}", root.display());
        }
    }

    Ok(())
}
