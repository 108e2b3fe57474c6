use std::env;
use std::process::ExitCode;

use labor_engine::api::{AppState, create_router};
use labor_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/kr_labor";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = env::var("LABOR_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("LABOR_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let loader = match ConfigLoader::load(&config_dir) {
        Ok(loader) => loader,
        Err(e) => {
            error!(config_dir = %config_dir, "failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        config_dir = %config_dir,
        minimum_wage_years = loader.minimum_wage_table().years().count(),
        tax_year = loader.tax_rules().effective_year,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader));
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind_addr = %bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(bind_addr = %bind_addr, "Labor engine listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
