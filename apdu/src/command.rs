// Copyright (c) 2024 The CWS Host Project Authors

//! APDU command framing

use crate::{ApduError, Instruction, CWS_APDU_CLA, MAX_APDU_DATA_LEN};

/// An APDU command addressed to the secure element.
///
/// Built fresh per request and never mutated after construction. The
/// payload is raw bytes; hex encoding happens at the transport edge if the
/// underlying link requires it.
#[derive(Clone, Debug, PartialEq)]
pub struct ApduCommand {
    /// Class byte
    pub cla: u8,

    /// Instruction byte
    pub ins: u8,

    /// First parameter, instruction specific
    pub p1: u8,

    /// Second parameter, carries the chunk position flag for `TxPrepare`
    pub p2: u8,

    /// Command payload, at most [`MAX_APDU_DATA_LEN`] bytes
    pub data: Vec<u8>,
}

impl ApduCommand {
    /// Build a command for the given instruction
    pub fn new(ins: Instruction, p1: u8, p2: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            cla: CWS_APDU_CLA,
            ins: ins as u8,
            p1,
            p2,
            data: data.into(),
        }
    }

    /// The four byte command header, `CLA ∥ INS ∥ P1 ∥ P2`.
    ///
    /// This is also the prefix covered by the host authorization signature.
    pub fn header(&self) -> [u8; 4] {
        [self.cla, self.ins, self.p1, self.p2]
    }

    /// Encode to wire form: header, one byte payload length, payload
    pub fn encode(&self) -> Result<Vec<u8>, ApduError> {
        if self.data.len() > MAX_APDU_DATA_LEN {
            return Err(ApduError::PayloadOverflow);
        }

        let mut buff = Vec::with_capacity(5 + self.data.len());
        buff.extend_from_slice(&self.header());
        buff.push(self.data.len() as u8);
        buff.extend_from_slice(&self.data);

        Ok(buff)
    }
}

/// Hex rendering for protocol traces
impl core::fmt::Display for ApduCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x} {}",
            self.cla,
            self.ins,
            self.p1,
            self.p2,
            hex::encode(&self.data)
        )
    }
}
