use color_eyre::eyre::Result;
use gatehouse_adapters::GatehouseSettings;
use gatehouse_service::{AllowedOrigins, GatehouseService, build_command};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = GatehouseSettings::load()?;
    let command = build_command(&settings).await?;
    let allowed_origins = AllowedOrigins::parse(&settings.server.allowed_origins)?;

    let service = GatehouseService::new(command, &settings.session.cookie_name);
    let listener = tokio::net::TcpListener::bind(&settings.server.address).await?;
    tracing::info!(mode = ?settings.login.mode, "Starting gatehouse");

    service.run_standalone(listener, allowed_origins).await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
