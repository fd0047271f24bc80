use anyhow::Context;
use pagedigest::core::config::AppConfig;
use pagedigest::pipeline;
use tracing::error;

pub use pagedigest::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    pagedigest::setup_logging();

    // Capabilities are built once, before the runtime accepts any event.
    let startup = AppConfig::from_env()
        .context("Failed to load configuration")
        .and_then(|config| pipeline::bootstrap(&config).map(|_| ()));
    if let Err(e) = startup {
        error!("Startup failed: {:#}", e);
        return Err(e.into());
    }

    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
