/// Errors raised while resolving a pod's controller or tailing its siblings.
///
/// `Argument`, `NotFound`, `AmbiguousTarget` and `Kube` are fatal and abort the
/// session before the terminal is taken over. `StreamOpen` and `StreamRead`
/// stay inside the tailer that hit them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("pod name is required")]
    Argument,

    #[error("no pods found in namespace {namespace}")]
    NotFound { namespace: String },

    #[error(
        "{message}. Available pods:\n{}\nplease select a valid pod from the list above",
        list_candidates(.candidates)
    )]
    AmbiguousTarget {
        message: String,
        candidates: Vec<String>,
    },

    #[error("failed to open log stream for {pod}: {reason}")]
    StreamOpen { pod: String, reason: String },

    #[error("log stream for {pod} failed: {reason}")]
    StreamRead { pod: String, reason: String },

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn list_candidates(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|name| format!("- {}", name))
        .collect::<Vec<_>>()
        .join("\n")
}
