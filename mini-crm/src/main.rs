use crm_core::observability::init_tracing;
use dotenvy::dotenv;
use mini_crm::config::get_configuration;
use mini_crm::services::init_metrics;
use mini_crm::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "mini-crm",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await
}
