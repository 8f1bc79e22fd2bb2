pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
pub use config::Config;
use db::{NewUser, Store};
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder().label("app", "emporia")?;
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key, value)?;
        }

        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let cli = cli::Cli::parse();

    match cli.command.unwrap_or(cli::Commands::Serve) {
        cli::Commands::Serve => serve(config, prometheus_handle).await,

        cli::Commands::Init => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        cli::Commands::CreateAdmin { email, password } => {
            cmd_create_admin(&config, &email, password).await
        }

        cli::Commands::Prune => cmd_prune(&config).await,
    }
}

async fn serve(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Emporia v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;

    let shared = Arc::new(SharedState::new(config).await?);
    let app_state = api::create_app_state(shared.clone(), prometheus_handle).await;

    let retention = shared.retention_service.clone();
    let retention_handle = tokio::spawn(async move {
        if let Err(e) = retention.start().await {
            error!("Retention task error: {}", e);
        }
    });

    let app = api::router(app_state).await;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("🌐 API server running at http://0.0.0.0:{port}");
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    shared.retention_service.stop().await;
    retention_handle.abort();
    server_handle.abort();
    info!("Server stopped");

    Ok(())
}

async fn cmd_create_admin(
    config: &Config,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    if store.get_user_by_email(email).await?.is_some() {
        anyhow::bail!("A user with email '{email}' already exists");
    }

    let password = match password {
        Some(p) => p,
        None => {
            println!("Enter password for {email}:");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let user = store
        .create_user(
            NewUser {
                email: email.to_string(),
                password,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                phone: None,
                role: "admin".to_string(),
            },
            Some(&config.security),
        )
        .await?;

    println!("✓ Created admin: {}", user.email);
    println!("  API key: {}", user.api_key);

    Ok(())
}

async fn cmd_prune(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let retention = services::RetentionService::new(store, config.retention.clone());
    let pruned = retention.run_once().await?;

    println!(
        "✓ Pruned {pruned} events older than {} days",
        config.retention.events_retention_days
    );

    Ok(())
}
