// Copyright (c) 2024 The CWS Host Project Authors

//! APDU response framing and status words

use num_enum::TryFromPrimitive;
use strum::Display;

use crate::ApduError;

/// Status word reported on success
pub const SW_OK: u16 = 0x9000;

/// Known secure-element status words
///
/// The device may report words outside this set; those are carried verbatim
/// in [`ApduResponse::sw`].
#[derive(Copy, Clone, Debug, PartialEq, Display, TryFromPrimitive)]
#[repr(u16)]
pub enum StatusWord {
    /// Command completed
    Ok = 0x9000,

    /// Operation declined on-device or precondition unmet
    ConditionsNotSatisfied = 0x6985,

    /// Payload rejected by the device
    WrongData = 0x6a80,

    /// Instruction unknown to the device firmware
    InsNotSupported = 0x6d00,

    /// Class byte not recognised
    ClaNotSupported = 0x6e00,
}

/// A response returned by the secure element.
///
/// Wire form is `DATA ∥ SW1 ∥ SW2` with the status word big-endian.
#[derive(Clone, Debug, PartialEq)]
pub struct ApduResponse {
    /// Response payload, may be empty
    pub data: Vec<u8>,

    /// Raw status word
    pub sw: u16,
}

impl ApduResponse {
    /// Build a response (used by transports and test fixtures)
    pub fn new(data: impl Into<Vec<u8>>, sw: u16) -> Self {
        Self {
            data: data.into(),
            sw,
        }
    }

    /// Decode a response from raw transport bytes
    pub fn decode(buff: &[u8]) -> Result<Self, ApduError> {
        if buff.len() < 2 {
            return Err(ApduError::InvalidLength);
        }

        let n = buff.len() - 2;
        let sw = u16::from_be_bytes([buff[n], buff[n + 1]]);

        Ok(Self {
            data: buff[..n].to_vec(),
            sw,
        })
    }

    /// Whether the device reported success
    pub fn is_ok(&self) -> bool {
        self.sw == SW_OK
    }

    /// Map the raw status word onto [`StatusWord`] where known
    pub fn status(&self) -> Option<StatusWord> {
        StatusWord::try_from(self.sw).ok()
    }
}
