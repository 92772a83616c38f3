use crate::buffer::DEFAULT_MAX_LINES;
use crate::tailer::DEFAULT_TAIL_LINES;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "kubectl-siblings")]
#[command(about = "Show live logs of a pod and every pod sharing its controller, side by side")]
pub struct Cli {
    /// Pod whose controller's pods should be tailed
    pub pod: Option<String>,

    /// Namespace (defaults to the kubeconfig context namespace)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Kubeconfig context
    #[arg(long)]
    pub context: Option<String>,

    /// Container name (if multi-container pod)
    #[arg(short = 'c', long)]
    pub container: Option<String>,

    /// Lines of history to fetch per pod before following
    #[arg(long, default_value_t = DEFAULT_TAIL_LINES, value_parser = clap::value_parser!(i64).range(0..))]
    pub tail: i64,

    /// Maximum lines retained per pod
    #[arg(long, default_value_t = DEFAULT_MAX_LINES as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_lines: u64,

    /// Minimum milliseconds between redraws triggered by log output
    #[arg(long, default_value_t = 50)]
    pub render_interval_ms: u64,

    /// File receiving diagnostic logs while the terminal UI is active
    #[arg(long, default_value = "/tmp/kubectl-siblings.log")]
    pub log_file: String,

    /// Verbose diagnostic logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
