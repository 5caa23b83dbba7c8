//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the catalog draw, board construction and worker
//! coordination so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use pairs_core::{BoardError, DealError, Generation};

pub use crate::catalog::FetchError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to build board from catalog draw")]
    Board(#[from] BoardError),

    #[error("failed to deal board")]
    Deal(#[from] DealError),

    #[error("session {generation} was replaced before its board was dealt")]
    Superseded { generation: Generation },

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
