// Copyright (c) 2024 The CWS Host Project Authors

//! Generic transport abstraction for hiding underlying link types
//!
//! BLE and USB links live outside this crate; they plug in by implementing
//! [`Transport`] for their connection handle.

use core::fmt::{Debug, Display};

use async_trait::async_trait;

use cws_apdu::{ApduCommand, ApduResponse};

/// One connected secure-element device.
///
/// The protocol is strict request/reply: one command in flight per handle,
/// each response awaited before the next command is sent. Exclusive access
/// is expressed through `&mut self`, so two flows cannot interleave on one
/// handle without the caller making that choice explicit.
///
/// Implementations perform no retries and no reconnection; a failed
/// exchange leaves device session state unknown and surfaces immediately.
#[async_trait]
pub trait Transport {
    /// Link-specific error type
    type Error: Display + Debug + Send;

    /// Send one command and await the device response
    async fn exchange(&mut self, command: &ApduCommand) -> Result<ApduResponse, Self::Error>;
}
