use clap::Parser;
use swap_core::SwapConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "swap.toml")]
    config: String,

    /// Check database connectivity and exit
    #[arg(long)]
    health: bool,

    /// Skip seeding the sample catalog on startup
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience - production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match SwapConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging (RUST_LOG wins over the configured level)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    // Connect to DB
    let pool = match swap_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database {}: {}", config.database.url, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to database: {}", config.database.url);

    swap_core::db::run_migrations(&pool).await?;

    if args.health {
        match swap_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ SQLite connected: {}", v),
            Err(e) => {
                println!("❌ SQLite connection failed: {}", e);
                std::process::exit(1);
            }
        }

        match swap_core::catalog::count(&pool).await {
            Ok(n) => println!("✅ Catalog items: {}", n),
            Err(e) => {
                println!("❌ Catalog query failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("✅ Swap DB health check passed");
        return Ok(());
    }

    if config.service.seed_on_start && !args.no_seed {
        if let Err(e) = swap_core::seed::seed_sample_data(&pool).await {
            tracing::error!("Error seeding sample data: {}", e);
        }
    }

    if !config.http.enabled {
        tracing::warn!("HTTP server disabled in config, nothing to serve");
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    swap_server::http::start_http_server(pool.clone(), config, tx.subscribe()).await?;

    pool.close().await;
    Ok(())
}
