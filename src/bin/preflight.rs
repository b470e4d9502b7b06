use restaurant_storage::infra::{config, logging};
use restaurant_storage::DatabaseService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-schema-if-missing] [--debug]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DATABASE_MAX_CONNECTIONS (default {}), RUST_LOG\n",
        config::DEFAULT_MAX_CONNECTIONS
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_schema_if_missing = args.iter().any(|a| a == "--init-schema-if-missing");
    let debug = args.iter().any(|a| a == "--debug");

    logging::init_tracing(debug)?;

    // Force-read config (nice error messages if missing)
    let database_url = config::database_url()?;
    let max_connections = config::max_connections()?;
    tracing::info!(max_connections, "preflight starting");

    let db = DatabaseService::connect(&database_url, max_connections).await?;

    let server_version: String = sqlx::query_scalar("SHOW server_version")
        .fetch_one(db.pool())
        .await?;
    tracing::info!(%server_version, "database reachable");

    let missing = db.missing_tables().await?;
    if missing.is_empty() {
        tracing::info!("all tables present");
    } else if init_schema_if_missing {
        tracing::warn!(missing = %missing.join(","), "tables missing, initializing schema");
        db.init_schema().await?;
        let still_missing = db.missing_tables().await?;
        if !still_missing.is_empty() {
            db.close().await;
            return Err(anyhow::anyhow!(
                "tables still missing after schema init: {}",
                still_missing.join(", ")
            ));
        }
        tracing::info!("schema initialized");
    } else {
        db.close().await;
        return Err(anyhow::anyhow!(
            "missing tables: {}. Re-run with --init-schema-if-missing",
            missing.join(", ")
        ));
    }

    db.close().await;
    tracing::info!("preflight OK");
    Ok(())
}
