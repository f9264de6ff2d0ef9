use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use klotio::config::{LogConfig, LogFormat};
use klotio::{endpoints, Config, Router, Server, TracingLogger};

#[derive(Parser, Debug)]
#[command(name = "klotio", version, about = "klot-io service endpoints with request logging")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }

    init_tracing(&config.log);
    klotio::log::install_panic_hook();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        app = %config.group.app,
        "klotio starting"
    );

    let router = Router::new().logger(Arc::new(TracingLogger::new("klotio")));
    let router = endpoints::mount(router, &config.group);

    Server::bind(&config.server.bind)?.serve(router).await?;
    Ok(())
}

fn init_tracing(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
