use checkout_hex::application::totals_information::{
    GuestTotalsInformationManagement, TotalsInformationManagement,
};
use checkout_hex::config::Config;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SERVER_PORT / STORE_ID / WEBSITE_ID when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let store = config.store();
    tracing::info!(
        store_id = store.store_id,
        website_id = store.website_id,
        "resolved store"
    );

    let repo: Repo = build_repo();
    let service = GuestTotalsInformationManagement::new(
        repo.clone(),
        TotalsInformationManagement::new(repo.clone(), repo),
    );

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
