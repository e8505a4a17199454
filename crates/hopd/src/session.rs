use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hopcore_index::{EntryKind, IndexStore, ProgressSink, SearchResult};
use hopcore_query::QueryEngine;
use hopcore_shell::ShellActions;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::surface::{PresentationSurface, ResultDelivery, SurfaceLauncher, WindowChrome};
use crate::toggle::{SessionGuard, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Query(String),
    Activate {
        path: String,
        kind: Option<EntryKind>,
    },
    Reveal {
        path: String,
    },
    /// The surface's window belongs to process `pid`.
    AttachWindow {
        pid: u32,
    },
    /// The window adjust delay has elapsed.
    AdjustWindow,
    /// Show the cached recency view, or build the index if it is empty.
    StartIndexing,
    Deliver(ResultDelivery),
    Loading(bool),
    Terminate,
}

/// Cloneable address of a live session. Sends are queued on the session's
/// dispatch channel, so any thread may use it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(id: SessionId, tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns `false` once the session has shut down.
    pub fn send(&self, command: SessionCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn terminate(&self) -> bool {
        self.send(SessionCommand::Terminate)
    }
}

pub(crate) struct SessionContext {
    pub(crate) store: Arc<IndexStore>,
    pub(crate) roots: Arc<[PathBuf]>,
    pub(crate) result_limit: usize,
    pub(crate) batch_size: usize,
    pub(crate) index_grace: Duration,
    pub(crate) window_adjust_delay: Duration,
    pub(crate) launcher: Arc<dyn SurfaceLauncher>,
    pub(crate) chrome: Arc<dyn WindowChrome>,
    pub(crate) shell: Arc<dyn ShellActions>,
    pub(crate) guard: Arc<SessionGuard<SessionHandle>>,
}

pub(crate) async fn run_session(
    ctx: SessionContext,
    handle: SessionHandle,
    mut rx: mpsc::UnboundedReceiver<SessionCommand>,
) {
    let id = handle.id();
    let launcher = Arc::clone(&ctx.launcher);
    let launch_handle = handle.clone();
    let launched = tokio::task::spawn_blocking(move || launcher.launch(launch_handle)).await;

    let mut surface = match launched {
        Ok(Ok(surface)) => surface,
        Ok(Err(err)) => {
            warn!(session = id, error = %err, "session could not start");
            ctx.guard.release(id);
            return;
        }
        Err(err) => {
            warn!(session = id, error = %err, "surface launcher panicked");
            ctx.guard.release(id);
            return;
        }
    };
    info!(session = id, "session opened");

    send_after(ctx.index_grace, &handle, SessionCommand::StartIndexing);
    send_after(ctx.window_adjust_delay, &handle, SessionCommand::AdjustWindow);

    let mut building = false;
    let mut window_owner = None;
    let mut adjust_due = false;
    while let Some(command) = rx.recv().await {
        match command {
            SessionCommand::Query(text) => {
                let results = ctx.store.search(&text, ctx.result_limit);
                debug!(session = id, query = %text, hits = results.len(), "query answered");
                surface.deliver_results(ResultDelivery::Replace(results));
            }
            SessionCommand::Activate { path, kind } => {
                debug!(session = id, %path, ?kind, "opening result");
                if let Err(err) = ctx.shell.open_path(&path) {
                    warn!(session = id, error = %err, "failed to open result");
                }
            }
            SessionCommand::Reveal { path } => {
                debug!(session = id, %path, "revealing result");
                if let Err(err) = ctx.shell.reveal_path(&path) {
                    warn!(session = id, error = %err, "failed to reveal result");
                }
            }
            SessionCommand::AttachWindow { pid } => {
                debug!(session = id, pid, "surface window reported");
                window_owner = Some(pid);
                if adjust_due {
                    adjust_window(&ctx, id, pid);
                }
            }
            SessionCommand::AdjustWindow => {
                adjust_due = true;
                match window_owner {
                    Some(pid) => adjust_window(&ctx, id, pid),
                    None => debug!(session = id, "window adjust waits for the surface window"),
                }
            }
            SessionCommand::StartIndexing => {
                if building {
                    surface.set_loading(true);
                } else {
                    building = start_indexing(&ctx, &handle, surface.as_mut());
                }
            }
            SessionCommand::Deliver(delivery) => surface.deliver_results(delivery),
            SessionCommand::Loading(loading) => {
                if !loading {
                    building = false;
                }
                surface.set_loading(loading);
            }
            SessionCommand::Terminate => break,
        }
    }

    surface.dispose();
    ctx.guard.release(id);
    info!(session = id, "session closed");
}

fn send_after(delay: Duration, handle: &SessionHandle, command: SessionCommand) {
    let handle = handle.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        handle.send(command);
    });
}

fn adjust_window(ctx: &SessionContext, id: SessionId, pid: u32) {
    let chrome = Arc::clone(&ctx.chrome);
    tokio::spawn(async move {
        if let Err(err) = tokio::task::spawn_blocking(move || chrome.adjust(pid)).await {
            warn!(session = id, pid, error = %err, "window adjustment failed");
        }
    });
}

/// Reuses the current snapshot when it has anything to show; otherwise
/// starts a progressive build feeding this session. Returns whether a build
/// was started.
fn start_indexing(
    ctx: &SessionContext,
    handle: &SessionHandle,
    surface: &mut dyn PresentationSurface,
) -> bool {
    let recent = ctx.store.recent(ctx.result_limit);
    if !recent.is_empty() {
        surface.deliver_results(ResultDelivery::Replace(recent));
        surface.set_loading(false);
        return false;
    }

    surface.set_loading(true);
    info!(session = handle.id(), roots = ctx.roots.len(), "index empty, building");

    let store = Arc::clone(&ctx.store);
    let roots = Arc::clone(&ctx.roots);
    let batch_size = ctx.batch_size;
    let mut sink = SessionSink {
        handle: handle.clone(),
    };
    // Not cancellable: closing the session only makes the sink's sends fail.
    tokio::task::spawn_blocking(move || {
        store.build_progressive(&roots, batch_size, &mut sink);
    });
    true
}

/// Routes a build's preview stream through the session queue.
struct SessionSink {
    handle: SessionHandle,
}

impl ProgressSink for SessionSink {
    fn on_loading_changed(&mut self, loading: bool) {
        self.handle.send(SessionCommand::Loading(loading));
    }

    fn on_batch(&mut self, batch: Vec<SearchResult>) {
        self.handle
            .send(SessionCommand::Deliver(ResultDelivery::Append(batch)));
    }
}
