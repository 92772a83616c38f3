use crate::buffer::{SharedBuffer, StreamStatus};
use crate::error::Error;
use crate::kubernetes::ClusterApi;
use crate::ui::RenderTrigger;
use futures::io::AsyncReadExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Bytes requested per read from a log stream.
pub const CHUNK_SIZE: usize = 1024;

/// Lines of history requested when a stream is opened.
pub const DEFAULT_TAIL_LINES: i64 = 200;

/// Context for one pod's log tailing task.
pub struct TailContext<C> {
    pub cluster: Arc<C>,
    pub pod_name: String,
    pub tail_lines: i64,
    pub buffer: SharedBuffer,
    pub trigger: RenderTrigger,
    pub cancel: CancellationToken,
}

pub fn spawn_tail_task<C>(ctx: TailContext<C>) -> JoinHandle<()>
where
    C: ClusterApi + 'static,
{
    tokio::spawn(async move { tail(ctx).await })
}

/// Follow one pod's log into its buffer until the stream ends, fails or the
/// session is cancelled. Failures stay in this pane: an open failure
/// replaces the buffer with the error text, a read failure just stops.
pub async fn tail<C: ClusterApi>(ctx: TailContext<C>) {
    let TailContext {
        cluster,
        pod_name,
        tail_lines,
        buffer,
        trigger,
        cancel,
    } = ctx;

    info!("Starting to tail logs for pod {}", pod_name);

    let opened = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Tail for pod {} cancelled before the stream opened", pod_name);
            buffer.close();
            return;
        }
        opened = cluster.open_log_stream(&pod_name, tail_lines) => opened,
    };
    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to get log stream for pod {}: {}", pod_name, e);
            buffer.replace_with_error(&format!("Error getting logs: {}", e));
            trigger.request();
            return;
        }
    };
    buffer.set_status(StreamStatus::Streaming);
    trigger.request();

    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Tail for pod {} cancelled", pod_name);
                break;
            }
            read = stream.read(&mut chunk) => read,
        };
        match read {
            Ok(0) => {
                info!("Log stream ended for pod {}", pod_name);
                break;
            }
            Ok(n) => {
                buffer.append(&chunk[..n]);
                trigger.request();
            }
            Err(e) => {
                let err = Error::StreamRead {
                    pod: pod_name.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", err);
                break;
            }
        }
    }

    buffer.close();
    trigger.request();
}
