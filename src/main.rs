use anyhow::{Context, Result};
use shade_ramp::api::run_api_server;
use shade_ramp::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env().context("invalid configuration")?;
    run_api_server(config).await.context("API server failed")
}
