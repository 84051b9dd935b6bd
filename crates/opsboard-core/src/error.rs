//! Core error types.

use crate::api::ApiError;

/// Errors surfaced by the high-level `CoreRuntime` operations.
///
/// Network failures are also reported on the notice channel; the `Result`
/// is for programmatic callers. Realtime dispatch never produces these;
/// malformed frames are dropped inside the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no active session")]
    NoSession,

    #[error("unknown board: {0}")]
    UnknownBoard(String),

    #[error("unknown list: {0}")]
    UnknownList(String),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("unknown {kind}: {id}")]
    UnknownEntity { kind: &'static str, id: String },
}
