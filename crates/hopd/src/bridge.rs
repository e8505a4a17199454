//! Message shapes exchanged with an out-of-process search surface.

use hopcore_index::{EntryKind, SearchResult};
use serde::{Deserialize, Serialize};

use crate::session::SessionCommand;
use crate::surface::ResultDelivery;
use crate::toggle::SessionId;

/// Core to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceEvent {
    /// Requests for this session must carry `session`.
    Opened { session: SessionId },
    SetResults { results: Vec<SearchResult> },
    AppendResults { results: Vec<SearchResult> },
    SetLoading { loading: bool },
    Closed,
}

impl From<ResultDelivery> for SurfaceEvent {
    fn from(delivery: ResultDelivery) -> Self {
        match delivery {
            ResultDelivery::Replace(results) => Self::SetResults { results },
            ResultDelivery::Append(results) => Self::AppendResults { results },
        }
    }
}

/// Surface to core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceRequest {
    Query {
        text: String,
    },
    Activate {
        path: String,
        #[serde(default)]
        kind: Option<EntryKind>,
    },
    Reveal {
        path: String,
    },
    /// The surface's window is owned by process `pid`.
    Window {
        pid: u32,
    },
    Hide,
    StartIndexing,
}

/// A request tagged with the session it was issued for, so that a late
/// request from a closed surface cannot reach its successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressedRequest {
    pub session: SessionId,
    #[serde(flatten)]
    pub request: SurfaceRequest,
}

impl From<SurfaceRequest> for SessionCommand {
    fn from(request: SurfaceRequest) -> Self {
        match request {
            SurfaceRequest::Query { text } => Self::Query(text),
            SurfaceRequest::Activate { path, kind } => Self::Activate { path, kind },
            SurfaceRequest::Reveal { path } => Self::Reveal { path },
            SurfaceRequest::Window { pid } => Self::AttachWindow { pid },
            SurfaceRequest::Hide => Self::Terminate,
            SurfaceRequest::StartIndexing => Self::StartIndexing,
        }
    }
}
