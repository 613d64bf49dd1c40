use anyhow::Context;
use clap::Parser;
use iron_blog::{
    cli::{self, Cli, Command},
    config::LogFormat,
    posts::PostService,
    store::JsonFileStore,
    web::AppState,
    Config,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat, default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format, "iron_blog=debug,tower_http=debug");

    tracing::info!("Starting iron-blog");
    tracing::info!("Web server will listen on: {}", config.web_addr());
    tracing::info!("Posts are stored in: {}", config.data_file.display());

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let posts = PostService::new(store, &config.default_author_email);
    let app_state = AppState::from_config(posts, &config);

    iron_blog::web::serve(config.web_addr(), app_state)
        .await
        .context("Web server stopped")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve().await,
        command => {
            init_tracing(LogFormat::Pretty, "iron_blog=warn");
            let output = cli::run_client_command(command).await?;
            print!("{}", output);
            Ok(())
        }
    }
}
