mod tracing_setup;

use anyhow::Result;
use clap::Parser;
use scrawl_server::ServerConfig;

/// scrawl API server
#[derive(Parser, Debug)]
#[command(name = "scrawl", version, about = "users/posts REST API server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// PostgreSQL connection string (falls back to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_setup::init(args.debug)?;

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        database_url: args.database_url.unwrap_or(defaults.database_url),
    };

    tracing::info!(host = %config.host, port = config.port, "starting scrawl");
    scrawl_server::serve(config).await?;
    Ok(())
}
