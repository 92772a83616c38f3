use crate::cli::Cli;
use crate::error::{Error, Result};
use std::time::Duration;

/// Settings for one session, fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub namespace: String,
    pub pod_name: String,
    pub container: Option<String>,
    pub tail_lines: i64,
    pub max_lines: usize,
    pub render_interval: Duration,
}

impl SessionConfig {
    /// `default_namespace` comes from the kubeconfig and is used unless
    /// `--namespace` was given.
    pub fn from_cli(cli: &Cli, default_namespace: &str) -> Result<Self> {
        let pod_name = Self::pod_name(cli)?.to_string();

        Ok(Self {
            namespace: cli
                .namespace
                .clone()
                .unwrap_or_else(|| default_namespace.to_string()),
            pod_name,
            container: cli.container.clone(),
            tail_lines: cli.tail,
            max_lines: usize::try_from(cli.max_lines).unwrap_or(usize::MAX),
            render_interval: Duration::from_millis(cli.render_interval_ms),
        })
    }

    /// The requested pod name; missing or blank is an argument error.
    pub fn pod_name(cli: &Cli) -> Result<&str> {
        cli.pod
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(Error::Argument)
    }
}
