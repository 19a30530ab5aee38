use atelier::cli::{Cli, Command, run_maintenance};
use atelier::config::Config;
use atelier::server::{AtelierState, atelier_router};
use atelier::utils::logging::init_tracing;
use clap::Parser;
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load()?;
    init_tracing(&cfg.basic.loglevel);

    let anthropic = cfg.anthropic();
    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        model = %anthropic.model,
        messages_url = %anthropic.messages_url,
        ai_configured = anthropic.api_key.is_some(),
        proxy = %anthropic.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
    );

    let db = atelier::db::spawn(&cfg.basic.database_url).await?;

    match cli.into_command() {
        Command::Serve => serve(db, &cfg).await,
        command => {
            let outcome = run_maintenance(&db, command).await?;
            println!("{outcome}");
            Ok(())
        }
    }
}

async fn serve(
    db: atelier::db::DbActorHandle,
    cfg: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AtelierState::new(db, cfg)?;
    let app = atelier_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
