use std::path::PathBuf;
use std::sync::Arc;

use hopcore_config::Settings;
use hopcore_index::{BuildStats, IndexStore};
use hopcore_shell::ShellActions;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::bridge::SurfaceRequest;
use crate::session::{run_session, SessionContext, SessionHandle};
use crate::surface::{SurfaceLauncher, WindowChrome};
use crate::toggle::{SessionGuard, SessionId, SessionState, ToggleAction};

/// The out-of-scope pieces a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub launcher: Arc<dyn SurfaceLauncher>,
    pub chrome: Arc<dyn WindowChrome>,
    pub shell: Arc<dyn ShellActions>,
}

/// Owns the index store and the session guard. `toggle` is safe to call from
/// any thread, including one outside the tokio runtime.
pub struct LauncherService {
    settings: Settings,
    roots: Arc<[PathBuf]>,
    store: Arc<IndexStore>,
    collaborators: Collaborators,
    guard: Arc<SessionGuard<SessionHandle>>,
    runtime: Handle,
}

impl LauncherService {
    pub fn new(
        settings: Settings,
        roots: Vec<PathBuf>,
        store: Arc<IndexStore>,
        collaborators: Collaborators,
        runtime: Handle,
    ) -> Self {
        Self {
            settings,
            roots: roots.into(),
            store,
            collaborators,
            guard: Arc::new(SessionGuard::new()),
            runtime,
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.guard.state()
    }

    pub fn live_session(&self) -> Option<SessionId> {
        self.guard.with_live(|id, _| id)
    }

    /// Opens a session when none is live, otherwise asks the live one to
    /// close. Never waits on the session.
    pub fn toggle(&self) -> ToggleAction {
        let action = self.guard.toggle(
            |id| self.spawn_session(id),
            |handle| {
                if !handle.terminate() {
                    debug!(session = handle.id(), "session already shutting down");
                }
            },
        );
        debug!(?action, "toggle handled");
        action
    }

    /// Forwards a surface request to `session` if it is still the live
    /// session. Requests addressed to any other session are dropped.
    pub fn dispatch(&self, session: SessionId, request: SurfaceRequest) -> bool {
        let routed = self.guard.with_live(|live, handle| {
            if live == session {
                Ok(handle.send(request.into()))
            } else {
                Err(live)
            }
        });
        match routed {
            Some(Ok(true)) => true,
            Some(Ok(false)) => {
                debug!(session, "surface request dropped, session shutting down");
                false
            }
            Some(Err(live)) => {
                debug!(session, live, "stale surface request dropped");
                false
            }
            None => {
                debug!(session, "surface request dropped, no live session");
                false
            }
        }
    }

    /// Full build over the configured roots on a blocking worker.
    pub fn warm_index(&self) -> JoinHandle<BuildStats> {
        let store = Arc::clone(&self.store);
        let roots = Arc::clone(&self.roots);
        info!(roots = roots.len(), "warming index");
        self.runtime
            .spawn_blocking(move || store.build_full(&roots))
    }

    fn spawn_session(&self, id: SessionId) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(id, tx);

        let ctx = SessionContext {
            store: Arc::clone(&self.store),
            roots: Arc::clone(&self.roots),
            result_limit: self.settings.result_limit,
            batch_size: self.settings.batch_size,
            index_grace: self.settings.index_grace(),
            window_adjust_delay: self.settings.window_adjust_delay(),
            launcher: Arc::clone(&self.collaborators.launcher),
            chrome: Arc::clone(&self.collaborators.chrome),
            shell: Arc::clone(&self.collaborators.shell),
            guard: Arc::clone(&self.guard),
        };
        self.runtime.spawn(run_session(ctx, handle.clone(), rx));

        info!(session = id, "session spawned");
        handle
    }
}
