// Copyright (c) 2024 The CWS Host Project Authors

//! Device control APDUs

use crate::{ApduCommand, Instruction};

/// Power the device off, returning it to idle
pub fn power_off() -> ApduCommand {
    ApduCommand::new(Instruction::PowerOff, 0x00, 0x00, vec![])
}
