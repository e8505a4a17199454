//! Hotkey-driven session control for the launcher.
//!
//! A [`LauncherService`] keeps at most one search session alive. Each
//! session runs as its own task fed by a dispatch queue; the surface, the
//! window styling and the OS "open" action are collaborators injected through
//! [`Collaborators`].

mod bridge;
mod service;
mod session;
mod surface;
mod toggle;

pub use bridge::{AddressedRequest, SurfaceEvent, SurfaceRequest};
pub use service::{Collaborators, LauncherService};
pub use session::{SessionCommand, SessionHandle};
pub use surface::{
    NoChrome, PresentationSurface, ResultDelivery, SessionError, SurfaceLauncher, WindowChrome,
};
pub use toggle::{next_action, SessionGuard, SessionId, SessionState, ToggleAction, ToggleIntent};
