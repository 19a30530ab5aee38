use atelier::config::Config;
use atelier::mcp::{AtelierMcp, SERVER_NAME};
use atelier::utils::logging::init_stderr_tracing;
use mimalloc::MiMalloc;
use rmcp::{ServiceExt, transport::stdio};
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_stderr_tracing(&cfg.basic.loglevel);

    info!(
        server = SERVER_NAME,
        database_url = %cfg.basic.database_url,
        "starting MCP bridge on stdio"
    );

    let db = atelier::db::spawn(&cfg.basic.database_url).await?;
    let service = AtelierMcp::new(db)
        .serve(stdio())
        .await
        .inspect_err(|e| error!(error = %e, "failed to start MCP service"))?;

    match service.waiting().await {
        Ok(reason) => info!(?reason, "MCP bridge stopped"),
        Err(e) => error!(error = %e, "MCP bridge terminated with error"),
    }
    Ok(())
}
