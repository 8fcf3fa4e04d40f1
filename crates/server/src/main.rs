use server::{LocalDeployment, app_router};
use services::services::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = format!("{}:{}", config.host, config.port);
    if config.demo_mode() {
        info!("running in demo mode; data is lost on shutdown");
    }

    let deployment = LocalDeployment::new(config).await?;
    let router = app_router(&deployment).with_state(deployment);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
