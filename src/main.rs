mod buffer;
mod cli;
mod config;
mod error;
mod kubernetes;
mod resolver;
mod session;
mod tailer;
mod types;
mod ui;
mod utils;

use anyhow::Context;
use clap::Parser;
use kube::{Client, config as kube_config};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use cli::Cli;
use config::SessionConfig;
use error::Error;
use kubernetes::KubeCluster;
use session::Session;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            match err.downcast_ref::<Error>() {
                Some(Error::Argument) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Reject a missing pod name before touching the cluster.
    SessionConfig::pod_name(&cli)?;

    let kubeconfig = load_kube_config(cli.context.as_deref()).await?;
    let session_config = SessionConfig::from_cli(&cli, &kubeconfig.default_namespace)?;
    info!(
        "Looking up pod {} in namespace {}",
        session_config.pod_name, session_config.namespace
    );

    let client = Client::try_from(kubeconfig).context("failed to create Kubernetes client")?;
    let cluster = KubeCluster::new(
        client,
        &session_config.namespace,
        session_config.container.clone(),
    );

    Session::new(session_config, Arc::new(cluster)).run().await?;
    Ok(())
}

async fn load_kube_config(context: Option<&str>) -> anyhow::Result<kube_config::Config> {
    match context {
        Some(ctx) => kube_config::Config::from_kubeconfig(&kube_config::KubeConfigOptions {
            context: Some(ctx.to_string()),
            ..Default::default()
        })
        .await
        .with_context(|| format!("Context '{}' not found in kubeconfig", ctx)),
        None => kube_config::Config::infer()
            .await
            .context("Error building kubeconfig"),
    }
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    if std::io::stdout().is_terminal() {
        // The terminal UI owns the screen; diagnostics go to a file instead.
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cli.log_file)
        {
            Ok(log_file) => tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file))
                .init(),
            Err(e) => {
                eprintln!("Warning: Could not open {} for logging: {}", cli.log_file, e);
            }
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
