use hopcore_index::SearchResult;
use tracing::debug;

use crate::session::SessionHandle;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("presentation surface failed to start: {0}")]
    Launch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultDelivery {
    /// A complete result list: query answers and the recency view.
    Replace(Vec<SearchResult>),
    /// One progressive-build batch, added after what is already shown.
    Append(Vec<SearchResult>),
}

/// The search UI as seen from a session. Only the session's run loop calls
/// these, one at a time.
pub trait PresentationSurface: Send {
    fn deliver_results(&mut self, delivery: ResultDelivery);
    fn set_loading(&mut self, loading: bool);

    /// The session is over; tear the surface down.
    fn dispose(&mut self) {}
}

/// Creates a surface for a new session. The handle is how the surface talks
/// back: queries, activations, and hide requests all go through it.
pub trait SurfaceLauncher: Send + Sync {
    fn launch(&self, handle: SessionHandle) -> Result<Box<dyn PresentationSurface>, SessionError>;
}

/// Fire-and-forget styling of the surface's window, run once the adjust
/// delay has passed and the surface has said which process owns its window.
pub trait WindowChrome: Send + Sync {
    fn adjust(&self, owner_pid: u32);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoChrome;

impl WindowChrome for NoChrome {
    fn adjust(&self, owner_pid: u32) {
        debug!(owner_pid, "no window chrome on this platform");
    }
}
