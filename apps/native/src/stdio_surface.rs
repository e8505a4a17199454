//! JSON-lines bridge to a host-rendered search panel.
//!
//! Events go out one object per line on stdout; requests come back the same
//! way on stdin. Logs stay on stderr so the two never interleave.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use hopd::{
    AddressedRequest, LauncherService, PresentationSurface, ResultDelivery, SessionError,
    SessionHandle, SessionId, SurfaceEvent, SurfaceLauncher,
};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub(crate) struct StdioLauncher;

impl SurfaceLauncher for StdioLauncher {
    fn launch(&self, handle: SessionHandle) -> Result<Box<dyn PresentationSurface>, SessionError> {
        let surface = StdioSurface {
            session: handle.id(),
        };
        surface
            .emit(&SurfaceEvent::Opened {
                session: handle.id(),
            })
            .map_err(|err| SessionError::Launch(err.to_string()))?;
        Ok(Box::new(surface))
    }
}

struct StdioSurface {
    session: SessionId,
}

impl StdioSurface {
    fn emit(&self, event: &SurfaceEvent) -> io::Result<()> {
        write_event(&mut io::stdout().lock(), event)
    }

    fn emit_or_warn(&self, event: SurfaceEvent) {
        if let Err(err) = self.emit(&event) {
            warn!(session = self.session, error = %err, "surface write failed");
        }
    }
}

impl PresentationSurface for StdioSurface {
    fn deliver_results(&mut self, delivery: ResultDelivery) {
        self.emit_or_warn(delivery.into());
    }

    fn set_loading(&mut self, loading: bool) {
        self.emit_or_warn(SurfaceEvent::SetLoading { loading });
    }

    fn dispose(&mut self) {
        self.emit_or_warn(SurfaceEvent::Closed);
    }
}

fn write_event(out: &mut impl Write, event: &SurfaceEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    out.flush()
}

fn parse_request(line: &str) -> Option<Result<AddressedRequest, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Forwards stdin requests to the session they name until stdin closes.
pub(crate) fn spawn_request_reader(service: Arc<LauncherService>) -> io::Result<()> {
    thread::Builder::new()
        .name("hop-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "stdin read failed");
                        break;
                    }
                };
                match parse_request(&line) {
                    Some(Ok(AddressedRequest { session, request })) => {
                        service.dispatch(session, request);
                    }
                    Some(Err(err)) => warn!(error = %err, "ignoring malformed request"),
                    None => {}
                }
            }
            debug!("stdin closed, request reader exiting");
        })?;
    Ok(())
}
