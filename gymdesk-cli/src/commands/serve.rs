use anyhow::Result;
use gymdesk_config::GymdeskConfig;
use gymdesk_server::Server;
use tracing::info;

pub async fn handle_serve(
    mut config: GymdeskConfig,
    bind: Option<String>,
    port: Option<u16>,
    skip_migrations: bool,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting Gymdesk API ({})", config.environment);
    let server = Server::connect(config, !skip_migrations).await?;
    server.start().await
}
