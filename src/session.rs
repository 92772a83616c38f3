use crate::buffer::SharedBuffer;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::kubernetes::ClusterApi;
use crate::resolver;
use crate::tailer::{TailContext, spawn_tail_task};
use crate::types::Resolution;
use crate::ui::events::{event_loop, is_quit};
use crate::ui::{App, AppEvent, RenderTrigger, renderer};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const EVENT_QUEUE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Resolving,
    Discovering,
    Streaming,
    Terminated,
}

/// Pods to tail and the buffers their tailers will fill.
pub struct Discovery {
    pub resolution: Resolution,
    pub buffers: Vec<SharedBuffer>,
}

pub struct Session<C> {
    config: SessionConfig,
    cluster: Arc<C>,
    state: SessionState,
}

impl<C: ClusterApi + 'static> Session<C> {
    pub fn new(config: SessionConfig, cluster: Arc<C>) -> Self {
        Self {
            config,
            cluster,
            state: SessionState::Resolving,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        info!("Session state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Resolve the controller and create one buffer per sibling pod. Never
    /// touches the terminal.
    pub async fn discover(&mut self) -> Result<Discovery> {
        let resolution = match resolver::resolve(&*self.cluster, &self.config.pod_name).await {
            Ok(resolution) => resolution,
            Err(e) => {
                self.transition(SessionState::Terminated);
                return Err(e);
            }
        };
        self.transition(SessionState::Discovering);

        if resolution.pods.is_empty() {
            self.transition(SessionState::Terminated);
            return Err(Error::NotFound {
                namespace: self.config.namespace.clone(),
            });
        }

        let buffers = resolution
            .pods
            .iter()
            .map(|pod| SharedBuffer::new(pod.as_str(), self.config.max_lines))
            .collect();

        Ok(Discovery {
            resolution,
            buffers,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        let discovery = self.discover().await?;
        println!(
            "Found controller: {}",
            discovery.resolution.controller.describe()
        );

        let mut terminal = setup_terminal()?;
        let result = self.stream(&mut terminal, discovery).await;
        let restored = restore_terminal(&mut terminal);
        self.transition(SessionState::Terminated);
        result?;
        restored
    }

    /// Start every tailer and drive the UI until quit, then cancel and join
    /// the tailers.
    async fn stream<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        discovery: Discovery,
    ) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(EVENT_QUEUE_SIZE);
        let cancel = CancellationToken::new();

        let input = tokio::spawn(event_loop(event_tx.clone(), cancel.clone()));
        let trigger = RenderTrigger::new(event_tx);

        let tailers: Vec<_> = discovery
            .resolution
            .pods
            .iter()
            .zip(&discovery.buffers)
            .map(|(pod, buffer)| {
                spawn_tail_task(TailContext {
                    cluster: self.cluster.clone(),
                    pod_name: pod.clone(),
                    tail_lines: self.config.tail_lines,
                    buffer: buffer.clone(),
                    trigger: trigger.clone(),
                    cancel: cancel.clone(),
                })
            })
            .collect();
        drop(trigger);

        let mut app = App::new(
            discovery.resolution.controller.describe(),
            self.config.namespace.clone(),
            discovery.buffers,
        );
        self.transition(SessionState::Streaming);

        let result = run_event_loop(
            terminal,
            &mut app,
            &mut event_rx,
            self.config.render_interval,
        )
        .await;

        shutdown(cancel, event_rx, tailers, input).await;
        result
    }
}

/// Cancel and join every task of a session. The event queue is closed first so
/// a task blocked on a full queue sees the closed channel instead of waiting.
pub async fn shutdown(
    cancel: CancellationToken,
    events: mpsc::Receiver<AppEvent>,
    tailers: Vec<JoinHandle<()>>,
    input: JoinHandle<()>,
) {
    drop(events);
    cancel.cancel();
    for handle in tailers {
        if let Err(e) = handle.await {
            warn!("Tail task ended abnormally: {}", e);
        }
    }
    if let Err(e) = input.await {
        warn!("Input task ended abnormally: {}", e);
    }
    debug!("All tail tasks joined");
}

/// Redraw on resize immediately and on log activity at most once per
/// `render_interval`, always drawing once after the last write. Returns on
/// a quit key or when input ends.
pub async fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut mpsc::Receiver<AppEvent>,
    render_interval: Duration,
) -> Result<()> {
    renderer::render(terminal, app)?;
    let mut last_render = Instant::now();
    let mut dirty = false;

    loop {
        let next_render = last_render + render_interval;
        tokio::select! {
            event = events.recv() => match event {
                Some(AppEvent::Key(key)) => {
                    if is_quit(&key) {
                        info!("Quit requested");
                        return Ok(());
                    }
                }
                Some(AppEvent::Resize(width, height)) => {
                    debug!("Terminal resized to {}x{}", width, height);
                    app.resize(Rect::new(0, 0, width, height));
                    renderer::render(terminal, app)?;
                    last_render = Instant::now();
                    dirty = false;
                }
                Some(AppEvent::LogActivity) => {
                    app.mark_activity();
                    if last_render.elapsed() >= render_interval {
                        renderer::render(terminal, app)?;
                        last_render = Instant::now();
                        dirty = false;
                    } else {
                        dirty = true;
                    }
                }
                Some(AppEvent::InputClosed) | None => {
                    warn!("Terminal input closed, ending session");
                    return Ok(());
                }
            },
            _ = tokio::time::sleep_until(next_render), if dirty => {
                renderer::render(terminal, app)?;
                last_render = Instant::now();
                dirty = false;
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
