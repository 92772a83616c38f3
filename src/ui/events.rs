use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Some tailer appended to its buffer.
    LogActivity,
    /// The terminal input stream ended.
    InputClosed,
}

/// Forward terminal input to the session loop until cancelled.
pub async fn event_loop(tx: mpsc::Sender<AppEvent>, cancel: CancellationToken) {
    use crossterm::event::EventStream;

    let mut event_stream = EventStream::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            maybe_event = event_stream.next() => {
                let event = match maybe_event {
                    Some(Ok(Event::Key(key))) => AppEvent::Key(key),
                    Some(Ok(Event::Resize(width, height))) => AppEvent::Resize(width, height),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        AppEvent::InputClosed
                    }
                    None => AppEvent::InputClosed,
                };
                let closed = matches!(event, AppEvent::InputClosed);
                if tx.send(event).await.is_err() || closed {
                    break;
                }
            }
        }
    }
    debug!("Input event loop stopped");
}

pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}

/// Handle tailers use to request a redraw.
///
/// Requests are coalesced: when the queue is full a redraw is already
/// pending and will observe the newer buffer contents.
#[derive(Debug, Clone)]
pub struct RenderTrigger {
    tx: mpsc::Sender<AppEvent>,
}

impl RenderTrigger {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn request(&self) {
        match self.tx.try_send(AppEvent::LogActivity) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => debug!("Render request dropped; session loop is gone"),
        }
    }
}
