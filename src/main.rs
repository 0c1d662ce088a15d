use ras_rm_survey::config::AppConfig;
use ras_rm_survey::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // RUST_LOG overrides the configured level; sqlx stays at warn
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .filter_module("sqlx", log::LevelFilter::Warn)
        .init();

    log::info!(
        "Starting {} {} (server={})",
        config.service.name,
        config.service.app_version,
        config.server_address()
    );

    run_server(&config).await
}
