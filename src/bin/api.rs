//! Inventory API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;

use clap::Parser;
use inventory::api::{self, Config, ServerError};
use inventory::db::{Database, DatabaseConfig, DbError, SqliteDatabase};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(inventory::binary::database))]
    Database(#[from] DbError),

    #[error("API server error: {0}")]
    #[diagnostic(code(inventory::binary::api))]
    Api(#[from] ServerError),
}

#[derive(Parser)]
#[command(name = "inventory-api")]
#[command(author, version, about = "Inventory API server", long_about = None)]
struct Cli {
    /// Host address to bind to [env: INVENTORY_HOST, default: 0.0.0.0]
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on [env: INVENTORY_PORT, default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLx connection URL [env: INVENTORY_DATABASE_URL, default: sqlite://inventory.db]
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    api::init_tracing();

    serve(cli).await?;
    Ok(())
}

async fn serve(cli: Cli) -> Result<(), BinaryError> {
    let mut db_config = DatabaseConfig::new();
    if let Some(url) = cli.database_url {
        db_config = db_config.with_url(url);
    }

    info!("Opening database at {}", db_config.url);
    let db = SqliteDatabase::open(&db_config).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    info!("Database migrations complete");

    let mut config = Config::new();
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    let result = api::run(config, db.clone()).await;
    db.close().await;
    result?;

    Ok(())
}
