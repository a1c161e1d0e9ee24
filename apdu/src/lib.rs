// Copyright (c) 2024 The CWS Host Project Authors

//! Protocol / APDU definitions for CoolWallet secure-element communication
//!
//! This crate provides the wire-level command and response framing shared by
//! the host library and by tooling. Commands follow the classic APDU shape,
//! a four byte header (`CLA`, `INS`, `P1`, `P2`) followed by a one byte
//! length and a variable payload. Responses carry a payload followed by a
//! two byte big-endian status word.
//!
//! No I/O happens here, framing only. The host-side flows live in
//! `cws-host`.

use strum::Display;

pub mod command;
pub use command::ApduCommand;

pub mod response;
pub use response::{ApduResponse, StatusWord, SW_OK};

pub mod control;
pub mod tx;

/// APDU class byte for all secure-element commands
pub const CWS_APDU_CLA: u8 = 0x80;

/// Maximum command payload per APDU, in bytes.
///
/// Oversized transaction payloads are split into chunks of this size by the
/// host library, with the chunk position encoded in `P2`.
pub const MAX_APDU_DATA_LEN: usize = 250;

/// Secure-element APDU instruction codes
///
/// Static command table, consumed read-only. `CLA` is always
/// [`CWS_APDU_CLA`].
#[derive(Copy, Clone, Debug, PartialEq, Display)]
#[repr(u8)]
pub enum Instruction {
    /// Stage a transaction payload chunk for signing
    TxPrepare = 0x32,

    /// Finalise transaction preparation
    TxFinishPrepare = 0x34,

    /// Request transaction-detail acknowledgement (user approval)
    TxGetDetail = 0x36,

    /// Fetch the session signature-decryption key
    TxGetSignatureKey = 0x38,

    /// Clear device-side transaction state
    TxClear = 0x3a,

    /// Upload a pre-built script blob
    SendScript = 0x40,

    /// Execute a previously uploaded script
    ExecuteScript = 0x42,

    /// Power the device off
    PowerOff = 0x50,
}

/// Framing errors for response decoding
#[derive(Copy, Clone, Debug, PartialEq, Display)]
pub enum ApduError {
    /// Response shorter than the trailing status word
    InvalidLength,

    /// Command payload exceeds [`MAX_APDU_DATA_LEN`]
    PayloadOverflow,
}
