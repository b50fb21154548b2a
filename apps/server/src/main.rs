use anyhow::Context;
use club::domain::config::ApiConfig;
use club::kernel::config::load_config;
use club_server::{Server, init_logging};

/// `club-server [CONFIG]`; the configuration defaults to `config/server.toml`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let cfg: ApiConfig = load_config(path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = init_logging(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}
