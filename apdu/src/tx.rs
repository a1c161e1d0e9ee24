// Copyright (c) 2024 The CWS Host Project Authors

//! Transaction-phase APDUs, used to stage and sign a transaction on the
//! secure element.

use crate::{ApduCommand, Instruction};

/// Stage one chunk of the combined `payload ∥ host-signature` buffer.
///
/// `p1` carries the operation-type tag for the transaction, `p2` the chunk
/// position flag: `0x00` for a lone chunk, otherwise the 1-based chunk
/// index, with the high bit set on the final chunk.
pub fn prepare(p1: u8, p2: u8, chunk: &[u8]) -> ApduCommand {
    ApduCommand::new(Instruction::TxPrepare, p1, p2, chunk)
}

/// Finalise transaction preparation after the data phase
pub fn finish_prepare() -> ApduCommand {
    ApduCommand::new(Instruction::TxFinishPrepare, 0x00, 0x00, vec![])
}

/// Request transaction-detail acknowledgement.
///
/// A non-success status word here means the operation was not approved,
/// a defined outcome rather than a fault.
pub fn get_detail() -> ApduCommand {
    ApduCommand::new(Instruction::TxGetDetail, 0x00, 0x00, vec![])
}

/// Fetch the session signature-decryption key
pub fn get_signature_key() -> ApduCommand {
    ApduCommand::new(Instruction::TxGetSignatureKey, 0x00, 0x00, vec![])
}

/// Clear device-side transaction state
pub fn clear() -> ApduCommand {
    ApduCommand::new(Instruction::TxClear, 0x00, 0x00, vec![])
}

/// Upload a pre-built script blob
pub fn send_script(script: &[u8]) -> ApduCommand {
    ApduCommand::new(Instruction::SendScript, 0x00, 0x00, script)
}

/// Execute the uploaded script over `argument ∥ host-signature`
pub fn execute_script(data: &[u8]) -> ApduCommand {
    ApduCommand::new(Instruction::ExecuteScript, 0x00, 0x00, data)
}
