use clap::Parser;
use petdir_core::PetPool;
use petdir_server::{build_router, AppState, ServerConfig};

#[derive(Parser)]
#[command(name = "petdir-server", version, about = "Pet directory HTTP service")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = PetPool::open(&config.db, config.pool_size)?;
    let app = build_router(AppState::new(pool));

    let listener = config.bind().await?;
    log::info!("Pet directory listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
