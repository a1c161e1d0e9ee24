// Copyright (c) 2024 The CWS Host Project Authors

use core::fmt::{Debug, Display};

use crate::signature::SignatureError;

/// Host API error type, generic over the transport error
///
/// Failures bubble to the immediate caller unmodified; nothing is retried
/// or swallowed inside the library. After a [`Error::Transport`] failure
/// device session state is unknown and the caller should issue a clearing
/// handshake before retrying a flow from the start.
#[derive(Debug, thiserror::Error)]
pub enum Error<E: Display + Debug> {
    /// Link-level send/receive failure
    #[error("transport error: {0}")]
    Transport(E),

    /// Device rejected a command that gates the rest of the flow
    #[error("device rejected command (status {0:#06x})")]
    Device(u16),

    /// Transaction payload must not be empty
    #[error("empty transaction payload")]
    EmptyPayload,

    /// Signing or signature post-processing failure
    #[error(transparent)]
    Signature(#[from] SignatureError),
}
