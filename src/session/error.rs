use thiserror::Error;

use super::state::SessionStatus;

/// Precondition violations on the session control surface. The session is
/// left untouched whenever one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is already recording")]
    AlreadyRecording,

    #[error("no recording in progress (session is {status})")]
    NotRecording { status: SessionStatus },

    #[error("cannot reset while recording; stop the session first")]
    ResetWhileRecording,

    #[error("cannot change joint or patient while recording")]
    ConfigureWhileRecording,
}
